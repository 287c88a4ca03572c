//! Fixture emitter: validation cases as an include-guarded C++ header.
//!
//! ```text
//! #ifndef RANDOM_TENSORS_HPP
//! ...
//! namespace gen {
//!   const contraction_validation v1 { ... };
//!   const std::vector<contraction_validation> cvs { v1 };
//! }
//! #endif
//! ```
//!
//! Cases are numbered from 1 in emission order across all groups of a file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use tnval::{Contraction, NetworkCase};

use crate::error::FixtureError;
use crate::format::{bond_wire_list, tensor_info, wire_list};

/// A case the downstream harness knows how to read.
pub trait FixtureCase {
    /// C++ struct name of the case.
    const TYPE_NAME: &'static str;

    /// Write the initializer lines between the case's braces.
    fn write_body<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl FixtureCase for Contraction {
    const TYPE_NAME: &'static str = "contraction_validation";

    fn write_body<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for t in self.tensors() {
            writeln!(out, "    {},", tensor_info(t))?;
        }
        writeln!(out)?;
        writeln!(out, "    std::vector<qtnh::wire>{}", wire_list(self.wires()))
    }
}

impl FixtureCase for NetworkCase {
    const TYPE_NAME: &'static str = "tn_validation";

    fn write_body<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "    std::vector<tensor_info> {{")?;
        let infos: Vec<String> = self
            .tensors()
            .iter()
            .map(|t| format!("      {}", tensor_info(t)))
            .collect();
        writeln!(out, "{}", infos.join(",\n"))?;
        writeln!(out, "    }},")?;
        writeln!(out)?;

        writeln!(out, "    std::vector<bond_info> {{")?;
        let bonds: Vec<String> = self
            .bonds()
            .iter()
            .map(|b| format!("      bond_info {{ {}, {}, {}}}", b.i1, b.i2, bond_wire_list(&b.wires)))
            .collect();
        if !bonds.is_empty() {
            writeln!(out, "{}", bonds.join(",\n"))?;
        }
        writeln!(out, "    }},")?;
        writeln!(out)?;

        writeln!(out, "    {}", tensor_info(self.result()))
    }
}

/// Cases collected under one name.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<C> {
    pub name: String,
    pub cases: Vec<C>,
}

impl<C> Group<C> {
    pub fn new(name: impl Into<String>, cases: Vec<C>) -> Self {
        Self {
            name: name.into(),
            cases,
        }
    }
}

/// One generated header: a file name plus its groups.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFile<C> {
    file_name: String,
    groups: Vec<Group<C>>,
}

impl<C: FixtureCase> HeaderFile<C> {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            groups: Vec::new(),
        }
    }

    pub fn push_group(&mut self, group: Group<C>) {
        self.groups.push(group);
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn groups(&self) -> &[Group<C>] {
        &self.groups
    }

    /// Total number of cases across all groups.
    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    /// Include guard derived from the file name: `random-tn.hpp` becomes
    /// `RANDOM_TN_HPP`.
    pub fn guard(&self) -> String {
        self.file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Write the whole header to `out`.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let guard = self.guard();
        write!(out, "#ifndef {guard}\n#define {guard}\n\n")?;
        write!(out, "#include \"contraction-validation.hpp\"\n\n")?;
        write!(out, "using namespace std::complex_literals;\n\n")?;
        writeln!(out, "namespace gen {{")?;

        let mut id = 0;
        for case in self.groups.iter().flat_map(|g| &g.cases) {
            id += 1;
            writeln!(out, "  const {} v{id} {{", C::TYPE_NAME)?;
            case.write_body(out)?;
            write!(out, "  }};\n\n")?;
        }

        let mut first = 1;
        for group in &self.groups {
            let ids: Vec<String> = (first..first + group.cases.len())
                .map(|k| format!("v{k}"))
                .collect();
            writeln!(
                out,
                "  const std::vector<{}> {} {{ {} }};",
                C::TYPE_NAME,
                group.name,
                ids.join(", ")
            )?;
            first += group.cases.len();
        }

        write!(out, "}}\n\n#endif\n")
    }

    /// Render into memory.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.render(&mut buf)?;
        Ok(buf)
    }

    /// Render into a string.
    pub fn to_text(&self) -> io::Result<String> {
        let buf = self.to_bytes()?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the header into `dir`, replacing any existing file of the same name.
    ///
    /// The whole header is rendered before the file is touched, so a failed
    /// render leaves any previous file in place.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, FixtureError> {
        let path = dir.join(&self.file_name);
        let text = self.to_bytes()?;
        std::fs::write(&path, text)?;
        info!(
            "wrote {} cases in {} groups to {}",
            self.case_count(),
            self.groups.len(),
            path.display()
        );
        Ok(path)
    }
}
