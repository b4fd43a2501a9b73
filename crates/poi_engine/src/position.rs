//! Vessel position access.

use std::sync::{Arc, RwLock};

use common::Coordinate;

/// Query API for the current position. `None` means no fix yet.
pub trait PositionProvider: Send + Sync {
    fn position(&self) -> Option<Coordinate>;
}

/// Updatable position shared between the host adapter and the scheduler.
#[derive(Debug, Clone, Default)]
pub struct SharedPosition {
    inner: Arc<RwLock<Option<Coordinate>>>,
}

impl SharedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, position: Option<Coordinate>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = position;
    }
}

impl PositionProvider for SharedPosition {
    fn position(&self) -> Option<Coordinate> {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// A position that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinate);

impl PositionProvider for FixedPosition {
    fn position(&self) -> Option<Coordinate> {
        Some(self.0)
    }
}
