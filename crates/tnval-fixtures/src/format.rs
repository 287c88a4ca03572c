//! Text rendering of scalars, shapes and tensors in the fixture literal syntax.

use std::fmt::Write as _;

use tnval::{Tensor, Wire, c64};

/// Render one element as a C++ complex literal, e.g. ` 0.50-0.80i`.
///
/// The real part is fixed two-decimal with a leading space when it does not
/// start with a minus sign. The imaginary part carries an explicit sign and an
/// `i` suffix.
///
/// # Examples
///
/// ```
/// use tnval::c64;
/// use tnval_fixtures::format::complex_literal;
///
/// assert_eq!(complex_literal(c64::new(0.5, -0.8)), " 0.50-0.80i");
/// assert_eq!(complex_literal(c64::new(-0.04, 0.24)), "-0.04+0.24i");
/// ```
pub fn complex_literal(z: c64) -> String {
    let re = format!("{:.2}", z.re);
    let im = format!("{:.2}", z.im);
    let mut out = String::with_capacity(re.len() + im.len() + 3);
    if !re.starts_with('-') {
        out.push(' ');
    }
    out.push_str(&re);
    if !im.starts_with('-') {
        out.push('+');
    }
    out.push_str(&im);
    out.push('i');
    out
}

/// `tensor_info {{ dims }, { elements }}`.
pub fn tensor_info(t: &Tensor) -> String {
    let dims = join(t.shape().iter().map(|d| d.to_string()));
    let els = join(t.data().iter().map(|&z| complex_literal(z)));
    format!("tensor_info {{{{ {dims} }}, {{ {els} }}}}")
}

/// Wires of a pairwise case: `{{0, 1}, {2, 0}}`.
pub fn wire_list(wires: &[Wire]) -> String {
    let mut out = String::from("{");
    for (k, (a, b)) in wires.iter().enumerate() {
        if k > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{{{a}, {b}}}");
    }
    out.push('}');
    out
}

/// Wires of a network bond: `{{ 0, 2 }, { 1, 0 }}`.
pub fn bond_wire_list(wires: &[Wire]) -> String {
    let inner = join(wires.iter().map(|(a, b)| format!("{{ {a}, {b} }}")));
    format!("{{{inner}}}")
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
