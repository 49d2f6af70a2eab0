use thiserror::Error;
use tracing::{debug, warn};

use crate::channel::{ChannelError, RenderPort, RequestId, RequestIdGen, WorkerRequest, WorkerResponse};
use crate::controls::{self, ControlIntent};
use crate::coordinator::SliceCoordinator;
use crate::loader::LoadedFile;
use crate::state::ViewerState;
use crate::surface::{DrawableSurface, SurfaceError, SurfaceManager};

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// One viewer instance: authoritative view state plus the coordination
/// glue around a render worker reached through a [`RenderPort`].
///
/// The port is constructed by the caller and passed in, so several
/// viewers can coexist and tests can substitute a fake channel.
pub struct Viewer<P: RenderPort> {
    port: P,
    state: Option<ViewerState>,
    coordinator: SliceCoordinator,
    surface: Option<SurfaceManager>,
    read_ids: RequestIdGen,
    init_ids: RequestIdGen,
    latest_read: Option<RequestId>,
    latest_init: Option<RequestId>,
    renderer_ready: bool,
    renderer_failure: Option<String>,
    decode_failure: Option<String>,
}

impl<P: RenderPort> Viewer<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            state: None,
            coordinator: SliceCoordinator::new(),
            surface: None,
            read_ids: RequestIdGen::default(),
            init_ids: RequestIdGen::default(),
            latest_read: None,
            latest_init: None,
            renderer_ready: false,
            renderer_failure: None,
            decode_failure: None,
        }
    }

    /// Current view state, absent until a volume has been decoded.
    pub fn state(&self) -> Option<&ViewerState> {
        self.state.as_ref()
    }

    /// Whether a surface has been handed to the worker. The manager is
    /// retained as proof of transfer; the drawable itself is gone.
    pub fn surface_transferred(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(SurfaceManager::is_transferred)
    }

    /// Blocking notice set when renderer initialization failed. Render
    /// requests are suppressed for the rest of the session.
    pub fn renderer_failure(&self) -> Option<&str> {
        self.renderer_failure.as_deref()
    }

    /// Diagnostic from the most recent failed decode, cleared by the
    /// next load attempt. The previous view state survives a failure.
    pub fn decode_failure(&self) -> Option<&str> {
        self.decode_failure.as_deref()
    }

    /// Forward volume bytes to the worker for decoding. A newer load
    /// supersedes any in-flight one; the stale response will be dropped
    /// by id when it arrives.
    pub fn load_file(&mut self, file: LoadedFile) -> Result<(), ChannelError> {
        self.decode_failure = None;
        let id = self.read_ids.next();
        self.latest_read = Some(id);
        debug!(?id, name = %file.name, "requesting volume decode");
        self.port.send(WorkerRequest::ReadFile {
            id,
            bytes: file.bytes,
        })
    }

    /// Hand a freshly mounted drawable to the worker. The surface is
    /// converted into its transferable handle exactly once; the UI side
    /// must not touch it afterwards.
    ///
    /// A re-mount starts a fresh handshake: readiness drops until the
    /// new surface's ack and the current geometry is queued so the new
    /// surface gets its first render right after it.
    pub fn mount_surface(&mut self, surface: DrawableSurface) -> Result<(), ViewerError> {
        let mut manager = SurfaceManager::new(surface);
        let handle = manager.take_transferable()?;
        let id = self.init_ids.next();
        self.latest_init = Some(id);
        self.renderer_ready = false;
        debug!(?id, surface = handle.id(), "initializing renderer");
        self.port.send(WorkerRequest::InitRenderer {
            id,
            surface: handle,
        })?;
        if let Some(state) = self.state.take() {
            let state = state.with_renderer_ready(false);
            self.coordinator.reset_geometry();
            self.coordinator.observe(&state, &self.port)?;
            self.state = Some(state);
        }
        self.surface = Some(manager);
        Ok(())
    }

    /// Apply a control intent to the current state and derive at most
    /// one render request from the change. A no-op intent (clamped away
    /// or equal to the current value) sends nothing.
    pub fn apply(&mut self, intent: ControlIntent) -> Result<(), ChannelError> {
        let Some(current) = &self.state else {
            debug!("ignoring control intent before a volume is loaded");
            return Ok(());
        };
        let next = controls::apply(current, intent);
        if next == *current {
            return Ok(());
        }
        self.coordinator.observe(&next, &self.port)?;
        self.state = Some(next);
        Ok(())
    }

    /// Drain and handle buffered worker responses. Call from the UI
    /// loop; never blocks and never assumes a response is imminent.
    pub fn pump(&mut self) -> Result<(), ChannelError> {
        loop {
            let responses = self.port.drain_responses(32);
            if responses.is_empty() {
                return Ok(());
            }
            for response in responses {
                self.handle_response(response)?;
            }
        }
    }

    fn handle_response(&mut self, response: WorkerResponse) -> Result<(), ChannelError> {
        match response {
            WorkerResponse::Properties { id, properties } => {
                if self.latest_read != Some(id) {
                    debug!(?id, "discarding stale decode response");
                    return Ok(());
                }
                // Whole-state replacement for the new volume; the
                // renderer handshake outlives individual loads.
                let state = ViewerState::new(&properties).with_renderer_ready(self.renderer_ready);
                self.coordinator.reset_geometry();
                self.coordinator.observe(&state, &self.port)?;
                self.state = Some(state);
                Ok(())
            }
            WorkerResponse::DecodeFailed { id, reason } => {
                if self.latest_read != Some(id) {
                    debug!(?id, "discarding stale decode failure");
                    return Ok(());
                }
                warn!(%reason, "volume decode failed");
                self.decode_failure = Some(reason);
                Ok(())
            }
            WorkerResponse::Ready { id } => {
                if self.latest_init != Some(id) {
                    debug!(?id, "discarding stale readiness ack");
                    return Ok(());
                }
                self.renderer_ready = true;
                if let Some(state) = self.state.take() {
                    self.state = Some(state.with_renderer_ready(true));
                }
                self.coordinator.mark_ready(&self.port)
            }
            WorkerResponse::InitFailed { id, reason } => {
                if self.latest_init != Some(id) {
                    debug!(?id, "discarding stale init failure");
                    return Ok(());
                }
                self.renderer_failure = Some(reason);
                self.coordinator.mark_failed();
                Ok(())
            }
        }
    }
}
