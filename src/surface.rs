use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The drawable was already converted into a transferable handle.
    /// This is a lifecycle bug in the caller, never a silent no-op.
    #[error("surface {0} was already transferred to the worker")]
    AlreadyTransferred(u64),
}

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// A drawable target owned by the UI side until it is handed to the
/// worker. Each mount constructs a fresh surface with a fresh identity.
#[derive(Debug)]
pub struct DrawableSurface {
    id: u64,
}

impl DrawableSurface {
    pub fn new() -> Self {
        Self {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Default for DrawableSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive handle to a transferred surface. Deliberately not `Clone`:
/// ownership moves to the worker exactly once and the UI side must not
/// retain a way to touch the drawable afterwards.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    id: u64,
}

impl SurfaceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Tracks the one-time conversion of a drawable into a transferable
/// handle. A re-mount builds a new manager around a new surface rather
/// than reusing this one.
#[derive(Debug)]
pub struct SurfaceManager {
    id: u64,
    surface: Option<DrawableSurface>,
}

impl SurfaceManager {
    pub fn new(surface: DrawableSurface) -> Self {
        Self {
            id: surface.id,
            surface: Some(surface),
        }
    }

    /// Convert the drawable into its transferable handle. Succeeds
    /// exactly once; any further call reports a [`SurfaceError`].
    pub fn take_transferable(&mut self) -> Result<SurfaceHandle, SurfaceError> {
        let surface = self
            .surface
            .take()
            .ok_or(SurfaceError::AlreadyTransferred(self.id))?;
        Ok(SurfaceHandle { id: surface.id })
    }

    pub fn is_transferred(&self) -> bool {
        self.surface.is_none()
    }
}
