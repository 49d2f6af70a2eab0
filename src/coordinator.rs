use tracing::{debug, warn};

use crate::channel::{ChannelError, RenderPort, SliceGeometry, WorkerRequest};
use crate::state::ViewerState;

/// Derives render requests from view-state changes and sequences them
/// against renderer readiness.
///
/// Invariants:
///  - while the renderer is not ready, at most one geometry is retained
///    (the most recent) and flushed strictly after the `Ready` ack;
///  - a geometry identical to the last one sent is never re-sent;
///  - after a renderer initialization failure no request leaves this
///    coordinator for the rest of the session.
#[derive(Debug, Default)]
pub struct SliceCoordinator {
    last_sent: Option<SliceGeometry>,
    pending: Option<SliceGeometry>,
    renderer_failed: bool,
}

impl SliceCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a freshly replaced state and issue at most one render
    /// request for it.
    pub fn observe(
        &mut self,
        state: &ViewerState,
        port: &impl RenderPort,
    ) -> Result<(), ChannelError> {
        if self.renderer_failed {
            return Ok(());
        }
        let geometry = SliceGeometry::of(state);
        if !state.renderer_ready {
            debug!("renderer not ready, queueing render request");
            self.pending = Some(geometry);
            return Ok(());
        }
        self.dispatch(geometry, port)
    }

    /// Flush the retained request, if any, after the readiness ack.
    pub fn mark_ready(&mut self, port: &impl RenderPort) -> Result<(), ChannelError> {
        if self.renderer_failed {
            return Ok(());
        }
        if let Some(geometry) = self.pending.take() {
            self.dispatch(geometry, port)?;
        }
        Ok(())
    }

    /// Permanently suppress render requests for this session.
    pub fn mark_failed(&mut self) {
        warn!("renderer unavailable, suppressing render requests for this session");
        self.renderer_failed = true;
        self.pending = None;
    }

    pub fn is_suppressed(&self) -> bool {
        self.renderer_failed
    }

    /// Forget sent/pending geometry when a new volume replaces the view
    /// state. The failure latch survives: it is scoped to the session,
    /// not to the loaded file.
    pub fn reset_geometry(&mut self) {
        self.last_sent = None;
        self.pending = None;
    }

    fn dispatch(
        &mut self,
        geometry: SliceGeometry,
        port: &impl RenderPort,
    ) -> Result<(), ChannelError> {
        if self.last_sent.as_ref() == Some(&geometry) {
            return Ok(());
        }
        port.send(WorkerRequest::RenderSlice {
            geometry: geometry.clone(),
        })?;
        self.last_sent = Some(geometry);
        Ok(())
    }
}
