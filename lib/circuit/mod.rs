//! Append-only circuits of gate operations on named qudits.
//!
//! A [`Circuit`] is a plain ordered list of [`Operation`]s; it does not
//! simulate anything. Circuits are most conveniently assembled from a
//! declarative argument list with [`build_circuit`] or the
//! [`circuit!`](crate::circuit!) macro.

use std::fmt;
use itertools::Itertools;
use thiserror::Error;
use crate::{
    ErrorKind,
    gate::Gate,
    qudit::Qudit,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("error in operation: gate {0} acts on {1} qudit(s), but {2} were given")]
    ArityMismatch(String, usize, usize),

    #[error("error in operation: gate {0} expects dimension {1} on slot {2}, but qudit '{3}' has dimension {4}")]
    SlotDimension(String, usize, usize, String, usize),

    #[error("error in operation: qudit '{0}' appears more than once")]
    DuplicateQudit(String),
}
pub type CircuitResult<T> = Result<T, CircuitError>;
use CircuitError::*;

impl CircuitError {
    /// Return the broad category of `self`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArityMismatch(..) | DuplicateQudit(_) => ErrorKind::Validation,
            SlotDimension(..) => ErrorKind::DimensionMismatch,
        }
    }
}

pub mod builder;
pub use builder::{ Arg, BuildError, BuildResult, Builder, build_circuit };

/// A gate applied to an ordered list of qudits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    gate: Gate,
    qudits: Vec<Qudit>,
}

impl Operation {
    /// Create a new operation.
    ///
    /// Fails if the number of qudits differs from the gate's arity, if any
    /// qudit's dimension differs from the corresponding entry in the gate's
    /// shape, or if a qudit is repeated.
    pub fn new(gate: Gate, qudits: Vec<Qudit>) -> CircuitResult<Self> {
        let shape = gate.shape();
        if shape.len() != qudits.len() {
            return Err(ArityMismatch(gate.to_string(), shape.len(), qudits.len()));
        }
        for (k, (d, q)) in shape.iter().zip(&qudits).enumerate() {
            if *d != q.dim() {
                return Err(
                    SlotDimension(
                        gate.to_string(), *d, k, q.name().to_string(), q.dim())
                );
            }
        }
        if let Some(q) = qudits.iter().duplicates().next() {
            return Err(DuplicateQudit(q.name().to_string()));
        }
        Ok(Self { gate, qudits })
    }

    /// Return the gate.
    pub fn gate(&self) -> &Gate { &self.gate }

    /// Return the qudits acted on, in order.
    pub fn qudits(&self) -> &[Qudit] { &self.qudits }

    /// Unpack `self` into its gate and qudits.
    pub fn into_parts(self) -> (Gate, Vec<Qudit>) { (self.gate, self.qudits) }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on [{}]",
            self.gate,
            self.qudits.iter().map(|q| q.name()).join(", "),
        )
    }
}

/// An ordered, append-only sequence of operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    ops: Vec<Operation>,
}

impl Circuit {
    /// Create a new, empty `Circuit`.
    pub fn new() -> Self { Self::default() }

    /// Return the number of operations.
    pub fn len(&self) -> usize { self.ops.len() }

    /// Return `true` if `self` contains no operations.
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Append an already validated operation.
    pub fn push(&mut self, op: Operation) -> &mut Self {
        tracing::trace!(op = %op, "append operation");
        self.ops.push(op);
        self
    }

    /// Apply `gate` to `qudits`, validating the pairing first.
    pub fn apply<I>(&mut self, gate: Gate, qudits: I) -> CircuitResult<&mut Self>
    where I: IntoIterator<Item = Qudit>
    {
        let op = Operation::new(gate, qudits.into_iter().collect())?;
        Ok(self.push(op))
    }

    /// Return the operations in order.
    pub fn operations(&self) -> &[Operation] { &self.ops }

    /// Return an iterator over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> { self.ops.iter() }

    /// Return every qudit acted on, in order of first appearance.
    pub fn qudits(&self) -> Vec<&Qudit> {
        self.ops.iter()
            .flat_map(|op| op.qudits.iter())
            .unique()
            .collect()
    }

    /// Return the keys of all measurements, in order of first appearance.
    pub fn measurement_keys(&self) -> Vec<&str> {
        self.ops.iter()
            .filter_map(|op| op.gate.key())
            .unique()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl IntoIterator for Circuit {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter { self.ops.into_iter() }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, op) in self.ops.iter().enumerate() {
            if k > 0 { writeln!(f)?; }
            write!(f, "{}: {}", k, op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(name: &str, d: usize) -> Qudit { Qudit::new(name, d).unwrap() }

    #[test]
    fn operation_checks() {
        let x = Gate::x(3, 1).unwrap();
        assert!(Operation::new(x.clone(), vec![q("a", 3)]).is_ok());
        assert_eq!(
            Operation::new(x.clone(), vec![q("a", 3), q("b", 3)]),
            Err(ArityMismatch("X^1(d=3)".to_string(), 1, 2)),
        );
        assert_eq!(
            Operation::new(x, vec![q("a", 4)]),
            Err(SlotDimension("X^1(d=3)".to_string(), 3, 0, "a".to_string(), 4)),
        );
        let cx = Gate::cnot(2).unwrap();
        assert_eq!(
            Operation::new(cx.clone(), vec![q("a", 2), q("a", 2)]),
            Err(DuplicateQudit("a".to_string())),
        );
        let err = Operation::new(cx, vec![q("a", 2), q("b", 3)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn append_and_query() {
        let mut circuit = Circuit::new();
        circuit
            .apply(Gate::h(3).unwrap(), [q("a", 3)]).unwrap()
            .apply(Gate::cnot(3).unwrap(), [q("a", 3), q("b", 3)]).unwrap()
            .apply(Gate::measure(3, "m_b").unwrap(), [q("b", 3)]).unwrap()
            .apply(Gate::measure(3, "m_a").unwrap(), [q("a", 3)]).unwrap()
            .apply(Gate::measure(3, "m_b").unwrap(), [q("b", 3)]).unwrap();
        assert_eq!(circuit.len(), 5);
        let names: Vec<&str> = circuit.qudits().into_iter().map(|q| q.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(circuit.measurement_keys(), vec!["m_b", "m_a"]);
        assert_eq!(
            circuit.operations()[1].to_string(),
            "(C(d=3), X(d=3)) on [a, b]",
        );
        assert_eq!(
            circuit.to_string().lines().next(),
            Some("0: H(d=3) on [a]"),
        );
    }
}
