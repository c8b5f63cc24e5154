//! Named, dimension-typed qudits and a registry binding names to dimensions.

use std::{ fmt, sync::Arc };
use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;
use crate::ErrorKind;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("qudit '{0}' was previously defined with dimension {1}, but now is used with dimension {2}")]
    DimensionMismatch(String, usize, usize),

    #[error("invalid dimension {1} for qudit '{0}': qudits must have at least two levels")]
    InvalidDimension(String, usize),
}
pub type RegistryResult<T> = Result<T, RegistryError>;
use RegistryError::*;

impl RegistryError {
    /// Return the broad category of `self`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DimensionMismatch(..) => ErrorKind::DimensionMismatch,
            InvalidDimension(..) => ErrorKind::Domain,
        }
    }
}

/// An immutable qudit identity.
///
/// Two qudits are the same qudit iff their names are equal; a [`Registry`]
/// guarantees that a name is never bound to two different dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qudit {
    name: Arc<str>,
    dim: usize,
}

impl Qudit {
    /// Create a new qudit.
    ///
    /// Fails if `dim < 2`.
    pub fn new(name: &str, dim: usize) -> RegistryResult<Self> {
        if dim < 2 { return Err(InvalidDimension(name.to_string(), dim)); }
        Ok(Self { name: name.into(), dim })
    }

    /// Return the name of `self`.
    pub fn name(&self) -> &str { &self.name }

    /// Return the dimension of `self`.
    pub fn dim(&self) -> usize { self.dim }
}

impl fmt::Display for Qudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (d={})", self.name, self.dim)
    }
}

/// A name → qudit map preserving first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    index: HashMap<Arc<str>, usize>,
    order: Vec<Qudit>,
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool { self.order == other.order }
}

impl Eq for Registry { }

impl Registry {
    /// Create a new, empty `Registry`.
    pub fn new() -> Self { Self::default() }

    /// Return the number of registered qudits.
    pub fn len(&self) -> usize { self.order.len() }

    /// Return `true` if no qudits are registered.
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Look up a qudit by name.
    pub fn get(&self, name: &str) -> Option<&Qudit> {
        self.index.get(name).map(|k| &self.order[*k])
    }

    /// Return `true` if a qudit named `name` has been registered.
    pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

    /// Return the qudit named `name`, registering it with dimension `dim` if
    /// it is new.
    ///
    /// Fails if `name` is already bound to a different dimension, or if `dim`
    /// is invalid for a new qudit.
    pub fn resolve(&mut self, name: &str, dim: usize) -> RegistryResult<Qudit> {
        if let Some(qudit) = self.get(name) {
            if qudit.dim() != dim {
                return Err(DimensionMismatch(name.to_string(), qudit.dim(), dim));
            }
            return Ok(qudit.clone());
        }
        let qudit = Qudit::new(name, dim)?;
        tracing::trace!(name, dim, "registered qudit");
        self.index.insert(qudit.name.clone(), self.order.len());
        self.order.push(qudit.clone());
        Ok(qudit)
    }

    /// Return all registered qudits in first-seen order.
    pub fn order(&self) -> &[Qudit] { &self.order }

    /// Return an iterator over all registered qudits in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Qudit> { self.order.iter() }

    /// Return the names of all registered qudits in first-seen order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|q| q.name()).collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Qudit;
    type IntoIter = std::slice::Iter<'a, Qudit>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
