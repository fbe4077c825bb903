//! Workload Registry
//!
//! Explicit, ordered registration. Registration order is report order.

use crate::error::HarnessError;
use crate::workload::Workload;
use std::collections::HashSet;

/// Ordered collection of uniquely named workloads.
#[derive(Default)]
pub struct WorkloadRegistry {
    entries: Vec<Box<dyn Workload>>,
    names: HashSet<String>,
}

impl WorkloadRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workload.
    ///
    /// Fails with [`HarnessError::DuplicateName`] if the name is taken; the
    /// registry is left unchanged in that case.
    pub fn register<W: Workload + 'static>(&mut self, workload: W) -> Result<(), HarnessError> {
        self.register_boxed(Box::new(workload))
    }

    /// Register an already boxed workload.
    pub fn register_boxed(&mut self, workload: Box<dyn Workload>) -> Result<(), HarnessError> {
        let name = workload.name().to_string();
        if !self.names.insert(name.clone()) {
            return Err(HarnessError::DuplicateName { name });
        }
        tracing::debug!(workload = %name, group = workload.group(), "registered workload");
        self.entries.push(workload);
        Ok(())
    }

    /// Registered workloads in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn Workload> + '_ {
        self.entries.iter().map(|w| w.as_ref())
    }

    /// Mutable access in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Workload + 'static)> + '_ {
        self.entries.iter_mut().map(|w| w.as_mut())
    }

    /// Mutable access by registration index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Workload + 'static)> {
        self.entries.get_mut(index).map(|w| w.as_mut())
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|w| w.name()).collect()
    }

    /// Whether a workload with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of registered workloads
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for WorkloadRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkloadRegistry")
            .field("workloads", &self.names())
            .finish()
    }
}
