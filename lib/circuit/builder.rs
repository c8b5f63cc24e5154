//! Declarative circuit assembly.
//!
//! A circuit is described by a flat list of loosely typed [`Arg`]s, processed
//! left to right while tracking a *current dimension*:
//!
//! - a bare integer `d` sets the current dimension;
//! - a triple `(d, gate, names)` sets the current dimension to `d` and applies
//!   `gate` to the named qudits;
//! - a pair `(gate, names)` applies `gate` at the current dimension, which must
//!   have been set previously.
//!
//! `names` is either a single name or a list of names. Qudits are created on
//! first use with the dimension in effect at that point, and every later use
//! must agree with it. Measurements act on exactly one qudit and are keyed as
//! `m_<name>`; measuring the same qudit twice reuses the key.

use std::fmt;
use itertools::Itertools;
use thiserror::Error;
use crate::{
    ErrorKind,
    gate::{ Gate, GateKind, GateSpec },
    qudit::{ Qudit, Registry },
};
use super::{ Circuit, Operation };

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid argument format: {0}")]
    InvalidArg(String),

    #[error("invalid tuple format: {0}")]
    InvalidTuple(String),

    #[error("dimension must be specified before gate tuples without dimension")]
    NoDimension,

    #[error("invalid dimension {0}: qudits must have at least two levels")]
    InvalidDimension(i128),

    #[error("invalid gate type: {0}")]
    InvalidGate(String),

    #[error("qudit names must be a name or a list of names, got {0}")]
    InvalidNames(String),

    #[error("measurement gate can only measure one qudit at a time, got {0}")]
    MeasureArity(usize),

    #[error("qudit error: {0}")]
    RegistryError(#[from] crate::qudit::RegistryError),

    #[error("gate error: {0}")]
    GateError(#[from] crate::gate::GateError),

    #[error("circuit error: {0}")]
    CircuitError(#[from] super::CircuitError),
}
pub type BuildResult<T> = Result<T, BuildError>;
use BuildError::*;

impl BuildError {
    /// Return the broad category of `self`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvalidArg(_)
            | InvalidTuple(_)
            | NoDimension
            | InvalidGate(_)
            | InvalidNames(_)
            | MeasureArity(_) => ErrorKind::Validation,
            InvalidDimension(_) => ErrorKind::Domain,
            RegistryError(err) => err.kind(),
            GateError(err) => err.kind(),
            CircuitError(err) => err.kind(),
        }
    }
}

/// A single, loosely typed element of a circuit description.
///
/// Values are normally created through the `From` impls, e.g. `3.into()`,
/// `(GateKind::X, "q").into()`, or `(2, GateKind::CNOT, ["a", "b"]).into()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    /// An integer.
    Int(i128),
    /// A gate constructor.
    Gate(GateSpec),
    /// A single qudit name.
    Name(String),
    /// An ordered list of qudit names.
    Names(Vec<String>),
    /// A tuple of arguments.
    Tuple(Vec<Arg>),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => n.fmt(f),
            Self::Gate(spec) => spec.kind().fmt(f),
            Self::Name(name) => write!(f, "'{}'", name),
            Self::Names(names) =>
                write!(f, "[{}]", names.iter().map(|s| format!("'{}'", s)).join(", ")),
            Self::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
        }
    }
}

macro_rules! impl_arg_from_int {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for Arg {
                fn from(n: $t) -> Self { Self::Int(n as i128) }
            }
        )*
    }
}
impl_arg_from_int!(i32, i64, i128, u32, u64, usize);

impl From<&str> for Arg {
    fn from(name: &str) -> Self { Self::Name(name.to_string()) }
}

impl From<String> for Arg {
    fn from(name: String) -> Self { Self::Name(name) }
}

impl From<&String> for Arg {
    fn from(name: &String) -> Self { Self::Name(name.clone()) }
}

impl From<Vec<String>> for Arg {
    fn from(names: Vec<String>) -> Self { Self::Names(names) }
}

impl From<Vec<&str>> for Arg {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Arg {
    fn from(names: &[&str]) -> Self {
        Self::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Arg {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<GateKind> for Arg {
    fn from(kind: GateKind) -> Self { Self::Gate(kind.into()) }
}

impl From<GateSpec> for Arg {
    fn from(spec: GateSpec) -> Self { Self::Gate(spec) }
}

impl<A, B> From<(A, B)> for Arg
where
    A: Into<Arg>,
    B: Into<Arg>,
{
    fn from(pair: (A, B)) -> Self { Self::Tuple(vec![pair.0.into(), pair.1.into()]) }
}

impl<A, B, C> From<(A, B, C)> for Arg
where
    A: Into<Arg>,
    B: Into<Arg>,
    C: Into<Arg>,
{
    fn from(triple: (A, B, C)) -> Self {
        Self::Tuple(vec![triple.0.into(), triple.1.into(), triple.2.into()])
    }
}

fn as_dimension(n: i128) -> BuildResult<usize> {
    match usize::try_from(n) {
        Ok(d) if d >= 2 => Ok(d),
        _ => Err(InvalidDimension(n)),
    }
}

fn as_names(arg: &Arg) -> BuildResult<Vec<&str>> {
    match arg {
        Arg::Name(name) => Ok(vec![name.as_str()]),
        Arg::Names(names) => Ok(names.iter().map(|s| s.as_str()).collect()),
        other => Err(InvalidNames(other.to_string())),
    }
}

/// Accumulated state of a circuit under construction.
///
/// [`build_circuit`] folds a whole argument list through
/// [`step`][Self::step]; [`push`][Self::push] is the in-place equivalent for
/// incremental use. In either case a failing argument leaves the builder
/// exactly as it was before that argument.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    registry: Registry,
    circuit: Circuit,
    dim: Option<usize>,
}

impl Builder {
    /// Create a new, empty `Builder` with no dimension context.
    pub fn new() -> Self { Self::default() }

    /// Return the current dimension context, if set.
    pub fn dim(&self) -> Option<usize> { self.dim }

    /// Return the qudits registered so far.
    pub fn registry(&self) -> &Registry { &self.registry }

    /// Return the circuit built so far.
    pub fn circuit(&self) -> &Circuit { &self.circuit }

    /// Process a single argument, consuming `self`.
    pub fn step(mut self, arg: &Arg) -> BuildResult<Self> {
        self.push(arg)?;
        Ok(self)
    }

    /// Process a single argument in place.
    pub fn push(&mut self, arg: &Arg) -> BuildResult<&mut Self> {
        match arg {
            Arg::Int(n) => {
                self.dim = Some(as_dimension(*n)?);
            },
            Arg::Tuple(items) => {
                let (d, gate, names) =
                    match items.as_slice() {
                        [Arg::Int(n), gate, names] =>
                            (as_dimension(*n)?, gate, names),
                        [gate, names] =>
                            (self.dim.ok_or(NoDimension)?, gate, names),
                        _ => { return Err(InvalidTuple(arg.to_string())); },
                    };
                self.apply(d, gate, names)?;
                self.dim = Some(d);
            },
            other => { return Err(InvalidArg(other.to_string())); },
        }
        Ok(self)
    }

    // resolve everything against a staged copy of the registry and commit only
    // once the operation is known to be valid
    fn apply(&mut self, d: usize, gate: &Arg, names: &Arg) -> BuildResult<()> {
        let spec =
            match gate {
                Arg::Gate(spec) => *spec,
                other => { return Err(InvalidGate(other.to_string())); },
            };
        let names = as_names(names)?;
        let mut registry = self.registry.clone();
        let qudits: Vec<Qudit> =
            names.iter()
            .map(|name| registry.resolve(name, d))
            .collect::<Result<_, _>>()?;
        let gate =
            match spec {
                GateSpec::Measure => {
                    if qudits.len() != 1 { return Err(MeasureArity(qudits.len())); }
                    Gate::measure(d, format!("m_{}", qudits[0].name()))?
                },
                spec => spec.instantiate(d)?,
            };
        let op = Operation::new(gate, qudits)?;
        self.registry = registry;
        self.circuit.push(op);
        Ok(())
    }

    /// Unpack `self` into the circuit, the registry, and the registered qudits
    /// in first-seen order.
    pub fn finish(self) -> (Circuit, Registry, Vec<Qudit>) {
        let order = self.registry.order().to_vec();
        (self.circuit, self.registry, order)
    }
}

/// Assemble a circuit from a declarative argument list.
///
/// Returns the circuit, the registry of all qudits used, and those qudits in
/// the order they were first referenced. Processing stops at the first
/// invalid argument.
///
/// ```
/// use qudit_calc::{ circuit::{ Arg, build_circuit }, gate::GateKind };
///
/// let (circuit, _, order) =
///     build_circuit([
///         Arg::from((2, GateKind::X, "a")),
///         Arg::from((3, GateKind::Z, "b")),
///     ])
///     .unwrap();
/// assert_eq!(circuit.len(), 2);
/// assert_eq!(order[0].name(), "a");
/// assert_eq!(order[1].dim(), 3);
/// ```
pub fn build_circuit<I>(args: I) -> BuildResult<(Circuit, Registry, Vec<Qudit>)>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let builder =
        args.into_iter()
        .try_fold(Builder::new(), |builder, arg| builder.step(&arg.into()))?;
    tracing::debug!(
        ops = builder.circuit.len(),
        qudits = builder.registry.len(),
        "built circuit",
    );
    Ok(builder.finish())
}

/// Call [`build_circuit`] with abbreviated syntax.
///
/// Each argument is converted with [`Arg::from`], so plain integers, gate
/// kinds or specifications, names, lists of names, and pairs or triples of
/// these may be mixed freely.
///
/// # Example
/// ```
/// use qudit_calc::{ circuit, gate::{ GateKind::*, GateSpec } };
///
/// let (circuit, registry, order) =
///     circuit!(
///         3,
///         (H, "q0"),
///         (CNOT, ["q0", "q1"]),
///         (GateSpec::X(2), "q1"),
///         (Measure, "q1"),
///         (5, P, "r"),
///     )
///     .unwrap();
/// assert_eq!(circuit.len(), 5);
/// assert_eq!(registry.names(), vec!["q0", "q1", "r"]);
/// assert_eq!(order[2].dim(), 5);
/// assert_eq!(circuit.measurement_keys(), vec!["m_q1"]);
/// ```
#[macro_export]
macro_rules! circuit {
    ( $( $arg:expr ),* $(,)? ) => {
        {
            let args: Vec<$crate::circuit::Arg> =
                vec![ $( $crate::circuit::Arg::from($arg) ),* ];
            $crate::circuit::build_circuit(args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::BuildError::*;
    use crate::gate::{ GateKind::*, U8Params };

    fn names(order: &[Qudit]) -> Vec<(&str, usize)> {
        order.iter().map(|q| (q.name(), q.dim())).collect()
    }

    #[test]
    fn dimension_context() {
        let (circuit, registry, order) =
            crate::circuit!(3, (X, "q1"), (Z, "q1")).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(names(&order), vec![("q1", 3)]);
        assert_eq!(registry.len(), 1);
        for op in circuit.iter() {
            assert_eq!(op.qudits().len(), 1);
            assert_eq!(op.qudits()[0].name(), "q1");
            assert_eq!(op.gate().dim(), 3);
        }
        assert_eq!(circuit.operations()[0].gate(), &Gate::x(3, 1).unwrap());
        assert_eq!(circuit.operations()[1].gate(), &Gate::z(3, 1).unwrap());
    }

    #[test]
    fn explicit_dimensions() {
        let (circuit, _, order) =
            crate::circuit!((2, X, "a"), (3, Z, "b")).unwrap();
        assert_eq!(names(&order), vec![("a", 2), ("b", 3)]);
        assert_eq!(circuit.operations()[0].gate().dim(), 2);
        assert_eq!(circuit.operations()[1].gate().dim(), 3);
    }

    #[test]
    fn triple_sets_context() {
        let (circuit, _, order) =
            crate::circuit!((4, H, "a"), (X, "b")).unwrap();
        assert_eq!(names(&order), vec![("a", 4), ("b", 4)]);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn rebinding() {
        let (circuit, _, order) =
            crate::circuit!(4, (X, "q"), (4, X, "q")).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(names(&order), vec![("q", 4)]);

        let err = crate::circuit!(4, (X, "q"), (5, X, "q")).unwrap_err();
        assert_eq!(
            err,
            RegistryError(crate::qudit::RegistryError::DimensionMismatch(
                "q".to_string(), 4, 5)),
        );
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn missing_dimension() {
        let err = crate::circuit!((X, "q")).unwrap_err();
        assert_eq!(err, NoDimension);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "dimension must be specified before gate tuples without dimension",
        );
    }

    #[test]
    fn malformed_args() {
        assert_eq!(
            crate::circuit!(3, "q").unwrap_err(),
            InvalidArg("'q'".to_string()),
        );
        assert_eq!(
            crate::circuit!(3, X).unwrap_err(),
            InvalidArg("X".to_string()),
        );
        let four = Arg::Tuple(vec![3.into(), X.into(), "q".into(), "r".into()]);
        let err = build_circuit([four]).unwrap_err();
        assert_eq!(err, InvalidTuple("(3, X, 'q', 'r')".to_string()));
        let one = Arg::Tuple(vec![X.into()]);
        assert!(matches!(build_circuit([one]), Err(InvalidTuple(_))));
        // a triple whose first element is not an integer
        let err = crate::circuit!(("a", X, "q")).unwrap_err();
        assert!(matches!(err, InvalidTuple(_)));
        assert_eq!(crate::circuit!(1).unwrap_err(), InvalidDimension(1));
        assert_eq!(crate::circuit!(-3).unwrap_err(), InvalidDimension(-3));
        assert_eq!(crate::circuit!((0, X, "q")).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn wide_integers() {
        assert_eq!(Arg::from(u64::MAX), Arg::Int(u64::MAX as i128));
        assert_eq!(Arg::from(u64::MAX).to_string(), "18446744073709551615");
        let builder = Builder::new().step(&Arg::from(u64::MAX)).unwrap();
        assert_eq!(builder.dim(), usize::try_from(u64::MAX).ok());
        assert_eq!(
            crate::circuit!(i64::MIN).unwrap_err(),
            InvalidDimension(i64::MIN as i128),
        );
        assert_eq!(
            crate::circuit!(i128::MAX).unwrap_err(),
            InvalidDimension(i128::MAX),
        );
    }

    #[test]
    fn invalid_gate_and_names() {
        let err = crate::circuit!(3, ("q", "r")).unwrap_err();
        assert_eq!(err, InvalidGate("'q'".to_string()));
        assert_eq!(err.to_string(), "invalid gate type: 'q'");
        let err = crate::circuit!(3, (X, 5)).unwrap_err();
        assert_eq!(err, InvalidNames("5".to_string()));
    }

    #[test]
    fn name_lists() {
        let (circuit, _, order) =
            crate::circuit!(3, (CNOT, ["c", "t"]), (CZ, vec!["t", "c"])).unwrap();
        assert_eq!(names(&order), vec![("c", 3), ("t", 3)]);
        let qs: Vec<&str> =
            circuit.operations()[1].qudits().iter().map(|q| q.name()).collect();
        assert_eq!(qs, vec!["t", "c"]);
        // a list with a single name is the same as a bare name
        let (single, _, _) = crate::circuit!(3, (X, ["c"])).unwrap();
        let (bare, _, _) = crate::circuit!(3, (X, "c")).unwrap();
        assert_eq!(single, bare);
    }

    #[test]
    fn arity_errors() {
        let err = crate::circuit!(3, (CNOT, "c")).unwrap_err();
        assert!(matches!(err, CircuitError(crate::circuit::CircuitError::ArityMismatch(..))));
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = crate::circuit!(3, (CNOT, ["c", "c"])).unwrap_err();
        assert!(matches!(err, CircuitError(crate::circuit::CircuitError::DuplicateQudit(_))));
    }

    #[test]
    fn measurement_keys() {
        let (circuit, _, _) =
            crate::circuit!(3, (H, "a"), (Measure, "a"), (Measure, "b"), (Measure, "a"))
            .unwrap();
        let keys: Vec<Option<&str>> =
            circuit.iter().map(|op| op.gate().key()).collect();
        assert_eq!(keys, vec![None, Some("m_a"), Some("m_b"), Some("m_a")]);
        assert_eq!(circuit.measurement_keys(), vec!["m_a", "m_b"]);
        assert_eq!(circuit.operations()[1].gate().shape(), vec![3]);

        let err = crate::circuit!(3, (Measure, ["a", "b"])).unwrap_err();
        assert_eq!(err, MeasureArity(2));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn gate_parameters() {
        let (circuit, _, _) =
            crate::circuit!(
                5,
                (GateSpec::X(3), "q"),
                (GateSpec::Z(-1), "q"),
                (GateSpec::U8(U8Params::new(3, 2, 1)), "q"),
            )
            .unwrap();
        let gates: Vec<String> =
            circuit.iter().map(|op| op.gate().to_string()).collect();
        assert_eq!(gates, vec!["X^3(d=5)", "Z^4(d=5)", "U8(d=5)"]);
    }

    #[test]
    fn gate_domain_errors() {
        let err = crate::circuit!(4, (P, "q")).unwrap_err();
        assert_eq!(err, GateError(crate::gate::GateError::PhaseDimension(4)));
        assert_eq!(err.kind(), ErrorKind::Domain);
        let err = crate::circuit!((2, U8, "q")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Numerical);
    }

    #[test]
    fn fail_fast_is_atomic() {
        let mut builder = Builder::new();
        builder.push(&3.into()).unwrap();
        builder.push(&(X, "a").into()).unwrap();
        // "b" would be registered before the measurement arity check fails
        let err = builder.push(&(Measure, ["a", "b"]).into()).unwrap_err();
        assert_eq!(err, MeasureArity(2));
        assert!(!builder.registry().contains("b"));
        assert_eq!(builder.circuit().len(), 1);
        // a failing triple does not change the dimension context
        assert!(builder.push(&(7, P, "c").into()).is_ok());
        assert!(builder.push(&(9, P, "d").into()).is_err());
        assert_eq!(builder.dim(), Some(7));
        assert!(!builder.registry().contains("d"));

        let (circuit, registry, order) = builder.finish();
        assert_eq!(circuit.len(), 2);
        assert_eq!(registry.names(), vec!["a", "c"]);
        assert_eq!(names(&order), vec![("a", 3), ("c", 7)]);
    }

    #[test]
    fn fold_steps() {
        let builder =
            Builder::new()
            .step(&2.into()).unwrap()
            .step(&(H, "a").into()).unwrap();
        assert_eq!(builder.dim(), Some(2));
        assert_eq!(builder.circuit().len(), 1);
        assert!(builder.step(&"x".into()).is_err());
    }

    #[test]
    fn empty() {
        let (circuit, registry, order) = build_circuit(Vec::<Arg>::new()).unwrap();
        assert!(circuit.is_empty() && registry.is_empty() && order.is_empty());
        let (circuit, _, _) = crate::circuit!(3).unwrap();
        assert!(circuit.is_empty());
    }
}
