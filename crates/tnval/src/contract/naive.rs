//! Loop-based labeled contraction kernel.
//!
//! Every operand axis carries a [`Label`]. Labels listed in the output are
//! free indices; every other label is summed over. A label may appear on any
//! number of operand axes, including twice on the same operand (a trace).
//! Callers are responsible for giving axes that share a label equal sizes.

use std::collections::HashMap;

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::increment;
use crate::tensor::Tensor;
use crate::wires::Label;

/// A tensor together with one label per axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand<'a, ElT: Scalar> {
    pub tensor: &'a Tensor<ElT>,
    pub labels: &'a [Label],
}

impl<'a, ElT: Scalar> Operand<'a, ElT> {
    pub fn new(tensor: &'a Tensor<ElT>, labels: &'a [Label]) -> Self {
        Self { tensor, labels }
    }
}

/// Where an operand axis takes its index value from.
#[derive(Debug, Clone, Copy)]
enum Source {
    Free(usize),
    Summed(usize),
}

/// Contract all `operands` at once, keeping `output` labels in that order.
///
/// For every assignment of the output labels this sums, over every
/// assignment of the remaining labels, the product of the operands'
/// elements. With no summed labels it is an outer product; with no output
/// labels the result is a rank-0 tensor.
pub(crate) fn contract_labeled<ElT: Scalar>(
    operands: &[Operand<'_, ElT>],
    output: &[Label],
) -> Result<Tensor<ElT>, TensorError> {
    let mut sizes: HashMap<Label, usize> = HashMap::new();
    let mut order: Vec<Label> = Vec::new();
    for op in operands {
        if op.labels.len() != op.tensor.ndim() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: op.tensor.ndim(),
                actual: op.labels.len(),
            });
        }
        for (&label, &dim) in op.labels.iter().zip(op.tensor.shape()) {
            let known = *sizes.entry(label).or_insert_with(|| {
                order.push(label);
                dim
            });
            debug_assert_eq!(known, dim, "label {label} bound to sizes {known} and {dim}");
        }
    }

    let output_shape: Vec<usize> = output
        .iter()
        .map(|l| sizes.get(l).copied())
        .collect::<Option<_>>()
        .ok_or(TensorError::WrongNumberOfIndices {
            expected: sizes.len(),
            actual: output.len(),
        })?;

    let summed: Vec<Label> = order.into_iter().filter(|l| !output.contains(l)).collect();
    let summed_shape: Vec<usize> = summed.iter().map(|l| sizes[l]).collect();

    // Per operand, per axis: (index source, stride)
    let plans: Vec<Vec<(Source, usize)>> = operands
        .iter()
        .map(|op| {
            op.labels
                .iter()
                .zip(op.tensor.strides())
                .map(|(l, &stride)| {
                    let source = match output.iter().position(|o| o == l) {
                        Some(k) => Source::Free(k),
                        None => Source::Summed(summed.iter().position(|s| s == l).unwrap_or(0)),
                    };
                    (source, stride)
                })
                .collect()
        })
        .collect();

    let mut result = Tensor::zeroed(&output_shape);
    let mut out_index = vec![0usize; output_shape.len()];
    let mut out_linear = 0;

    loop {
        let mut sum = ElT::zero();
        let mut sum_index = vec![0usize; summed_shape.len()];

        loop {
            let mut product: Option<ElT> = None;
            for (op, plan) in operands.iter().zip(plans.iter()) {
                let offset: usize = plan
                    .iter()
                    .map(|&(source, stride)| match source {
                        Source::Free(k) => out_index[k] * stride,
                        Source::Summed(k) => sum_index[k] * stride,
                    })
                    .sum();
                let value = op.tensor.data()[offset];
                product = Some(match product {
                    Some(p) => p * value,
                    None => value,
                });
            }
            sum = sum + product.unwrap_or_else(ElT::one);

            if !increment(&mut sum_index, &summed_shape) {
                break;
            }
        }

        result.data_mut()[out_linear] = sum;
        out_linear += 1;

        if !increment(&mut out_index, &output_shape) {
            break;
        }
    }

    Ok(result)
}
