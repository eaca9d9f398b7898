//! Fixed-size resource pool state machine
//!
//! One pool per resource kind (rooms, lockers). Each resource moves
//! AVAILABLE -> OCCUPIED on claim and back on release; there is no other
//! transition. The pool never grows or shrinks after construction.
//!
//! Key behaviors:
//! - Ids are dense and 1-based, so lookup is an index into the backing Vec
//! - Claim fails for unknown ids and for resources already occupied
//! - Release only succeeds for the session currently holding the resource

use crate::domain::error::EngineError;
use crate::domain::session::Resource;
use crate::domain::types::{PoolId, SessionId};
use serde::Serialize;
use tracing::warn;

/// Occupied/available tally for one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolCounts {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool<I> {
    resources: Vec<Resource<I>>,
}

impl<I: PoolId> ResourcePool<I> {
    /// Create `count` available resources with ids 1..=count
    pub fn new(count: usize) -> Self {
        Self { resources: (0..count).map(|i| Resource::new(I::from_index(i))).collect() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: I) -> Option<&Resource<I>> {
        self.resources.get(id.index()?)
    }

    fn get_mut(&mut self, id: I) -> Option<&mut Resource<I>> {
        let index = id.index()?;
        self.resources.get_mut(index)
    }

    /// All resources in id order
    pub fn resources(&self) -> &[Resource<I>] {
        &self.resources
    }

    pub fn available(&self) -> impl Iterator<Item = &Resource<I>> {
        self.resources.iter().filter(|r| r.is_available())
    }

    /// Succeeds only if `id` exists and is available right now
    pub fn ensure_available(&self, id: I) -> Result<(), EngineError> {
        match self.get(id) {
            Some(resource) if resource.is_available() => Ok(()),
            _ => Err(EngineError::ResourceUnavailable { kind: I::KIND, id: id.to_string() }),
        }
    }

    /// Mark `id` occupied by `session`
    pub fn claim(&mut self, id: I, session: SessionId) -> Result<(), EngineError> {
        self.ensure_available(id)?;
        if let Some(resource) = self.get_mut(id) {
            resource.occupy(session);
        }
        Ok(())
    }

    /// Return `id` to the pool if `session` holds it
    ///
    /// Returns false (and changes nothing) when the resource is unknown or
    /// held by someone else.
    pub fn release(&mut self, id: I, session: SessionId) -> bool {
        let Some(resource) = self.get_mut(id) else {
            warn!(kind = %I::KIND, id = %id, session = %session, "release_unknown_resource");
            return false;
        };

        if resource.occupant() != Some(session) {
            warn!(
                kind = %I::KIND,
                id = %id,
                session = %session,
                occupant = ?resource.occupant(),
                "release_not_held"
            );
            return false;
        }

        resource.vacate();
        true
    }

    pub fn counts(&self) -> PoolCounts {
        let occupied = self.resources.iter().filter(|r| !r.is_available()).count();
        PoolCounts { total: self.len(), occupied, available: self.len() - occupied }
    }
}
