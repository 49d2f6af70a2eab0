use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::{SliceGeometry, WorkerEndpoint, WorkerRequest, WorkerResponse};
use crate::state::VolumeProperties;
use crate::surface::SurfaceHandle;

/// Diagnostic from the external volume parser. Crosses the channel as a
/// plain message, so it carries text rather than structure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Diagnostic from the external rendering engine, e.g. a missing
/// graphics capability at initialization.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RendererError(pub String);

/// Seam to the external volume-file parser.
pub trait VolumeDecoder: Send + 'static {
    fn decode(&mut self, bytes: &[u8]) -> Result<VolumeProperties, DecodeError>;
}

/// Seam to the external rendering engine. After a successful
/// `initialize` the engine owns the surface and draws to it directly.
pub trait SliceRenderer: Send + 'static {
    fn initialize(&mut self, surface: SurfaceHandle) -> Result<(), RendererError>;

    fn render(&mut self, geometry: &SliceGeometry) -> Result<(), RendererError>;
}

/// The isolated execution context hosting decode and render. One worker
/// serves one viewer; requests arrive FIFO over the endpoint and failures
/// are reported back without ever tearing the loop down, so the worker
/// stays usable for a subsequent load.
pub struct RenderWorker<D, R> {
    decoder: D,
    renderer: R,
    endpoint: WorkerEndpoint,
    surface_initialized: bool,
}

impl<D: VolumeDecoder, R: SliceRenderer> RenderWorker<D, R> {
    pub fn new(decoder: D, renderer: R, endpoint: WorkerEndpoint) -> Self {
        Self {
            decoder,
            renderer,
            endpoint,
            surface_initialized: false,
        }
    }

    /// Run the worker on the current task until the UI side hangs up.
    pub async fn run(mut self) {
        while let Some(first) = self.endpoint.recv().await {
            if self.process_batch(first).is_err() {
                // UI side dropped the response channel; nothing left to
                // serve.
                return;
            }
        }
    }

    /// Drain whatever else is already queued and process the batch.
    /// Render requests are most-recent-wins: within the batch only the
    /// newest geometry is honored. Other kinds keep their FIFO positions.
    fn process_batch(
        &mut self,
        first: WorkerRequest,
    ) -> Result<(), crate::channel::ChannelError> {
        let mut batch = vec![first];
        while let Some(request) = self.endpoint.try_recv() {
            batch.push(request);
        }

        let last_render = batch
            .iter()
            .rposition(|request| matches!(request, WorkerRequest::RenderSlice { .. }));

        for (index, request) in batch.into_iter().enumerate() {
            if matches!(request, WorkerRequest::RenderSlice { .. }) && last_render != Some(index) {
                debug!("dropping superseded render request");
                continue;
            }
            self.handle(request)?;
        }
        Ok(())
    }

    fn handle(&mut self, request: WorkerRequest) -> Result<(), crate::channel::ChannelError> {
        match request {
            WorkerRequest::ReadFile { id, bytes } => {
                debug!(?id, len = bytes.len(), "decoding volume file");
                match self.decoder.decode(&bytes) {
                    Ok(properties) => {
                        info!(?id, dimensions = ?properties.dimensions, "volume decoded");
                        self.endpoint
                            .respond(WorkerResponse::Properties { id, properties })
                    }
                    Err(err) => {
                        warn!(?id, %err, "volume decode failed");
                        self.endpoint.respond(WorkerResponse::DecodeFailed {
                            id,
                            reason: err.to_string(),
                        })
                    }
                }
            }
            WorkerRequest::InitRenderer { id, surface } => {
                debug!(?id, surface = surface.id(), "initializing renderer");
                match self.renderer.initialize(surface) {
                    Ok(()) => {
                        self.surface_initialized = true;
                        self.endpoint.respond(WorkerResponse::Ready { id })
                    }
                    Err(err) => {
                        error!(?id, %err, "renderer initialization failed");
                        self.endpoint.respond(WorkerResponse::InitFailed {
                            id,
                            reason: err.to_string(),
                        })
                    }
                }
            }
            WorkerRequest::RenderSlice { geometry } => {
                if !self.surface_initialized {
                    // Readiness gating on the UI side makes this
                    // unreachable; reaching it means a lifecycle bug.
                    error!("render request before any surface was transferred");
                    return Ok(());
                }
                debug!(
                    axis = ?geometry.axis,
                    coordinate = geometry.coordinate,
                    "rendering slice"
                );
                if let Err(err) = self.renderer.render(&geometry) {
                    warn!(%err, "slice render failed");
                }
                Ok(())
            }
        }
    }

    /// Spawn the worker onto the tokio runtime.
    pub fn spawn(decoder: D, renderer: R, endpoint: WorkerEndpoint) -> JoinHandle<()> {
        tokio::spawn(Self::new(decoder, renderer, endpoint).run())
    }
}
