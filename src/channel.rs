use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::enums::{AnatomicalAxis, Rotation};
use crate::state::{DisplayWindow, ViewerState, VolumeProperties};
use crate::surface::SurfaceHandle;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("render worker channel is closed")]
    Closed,
}

/// Correlation id for requests that expect a response. Ids are monotonic
/// per message kind; a response carrying anything but the latest id for
/// its kind is stale and must be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

#[derive(Debug, Default)]
pub struct RequestIdGen {
    next: u64,
}

impl RequestIdGen {
    pub fn next(&mut self) -> RequestId {
        self.next += 1;
        RequestId(self.next)
    }
}

/// Full geometry of one slice render, derived from the view state in one
/// piece so the worker never combines parameters from two states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliceGeometry {
    pub axis: AnatomicalAxis,
    pub coordinate: u32,
    pub timepoint: u32,
    pub window: DisplayWindow,
    pub rotation: Rotation,
}

impl SliceGeometry {
    pub fn of(state: &ViewerState) -> Self {
        Self {
            axis: state.axis,
            coordinate: state.focal_point.coordinate(state.axis),
            timepoint: state.focal_point.t,
            window: state.window,
            rotation: state.rotation,
        }
    }
}

/// UI-to-worker messages. Delivery is FIFO; processing order across
/// kinds is not guaranteed by the worker.
#[derive(Debug, Serialize, Deserialize)]
pub enum WorkerRequest {
    /// Decode a volume file. A newer `ReadFile` supersedes any in-flight
    /// one; the stale response is dropped via its id.
    ReadFile { id: RequestId, bytes: Vec<u8> },
    /// Hand the transferred surface to the rendering engine. Sent at
    /// most once per surface instance.
    InitRenderer { id: RequestId, surface: SurfaceHandle },
    /// Fire-and-forget, most-recent-wins: the worker may drop any
    /// superseded render still sitting in its queue.
    RenderSlice { geometry: SliceGeometry },
}

/// Worker-to-UI messages.
#[derive(Debug, Serialize, Deserialize)]
pub enum WorkerResponse {
    Properties {
        id: RequestId,
        properties: VolumeProperties,
    },
    DecodeFailed {
        id: RequestId,
        reason: String,
    },
    Ready {
        id: RequestId,
    },
    InitFailed {
        id: RequestId,
        reason: String,
    },
}

/// UI-side port to the render worker. The viewer depends only on this
/// trait, so tests can substitute a fake channel and multiple viewer
/// instances can each own their own.
pub trait RenderPort {
    fn send(&self, request: WorkerRequest) -> Result<(), ChannelError>;

    /// Drain up to `max` buffered responses without blocking.
    fn drain_responses(&mut self, max: usize) -> Vec<WorkerResponse>;
}

/// Channel-backed [`RenderPort`] paired with a [`WorkerEndpoint`].
pub struct WorkerChannel {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

/// Worker-side end of the channel, consumed by the worker loop.
pub struct WorkerEndpoint {
    requests: mpsc::UnboundedReceiver<WorkerRequest>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
}

impl WorkerChannel {
    pub fn pair() -> (WorkerChannel, WorkerEndpoint) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        (
            WorkerChannel {
                requests: request_tx,
                responses: response_rx,
            },
            WorkerEndpoint {
                requests: request_rx,
                responses: response_tx,
            },
        )
    }
}

impl RenderPort for WorkerChannel {
    fn send(&self, request: WorkerRequest) -> Result<(), ChannelError> {
        self.requests.send(request).map_err(|_| ChannelError::Closed)
    }

    fn drain_responses(&mut self, max: usize) -> Vec<WorkerResponse> {
        let mut out = Vec::new();
        for _ in 0..max {
            match self.responses.try_recv() {
                Ok(response) => out.push(response),
                Err(_) => break,
            }
        }
        out
    }
}

impl WorkerEndpoint {
    /// Wait for the next request; `None` once the UI side is gone.
    pub async fn recv(&mut self) -> Option<WorkerRequest> {
        self.requests.recv().await
    }

    /// Pull an already-queued request without waiting.
    pub fn try_recv(&mut self) -> Option<WorkerRequest> {
        self.requests.try_recv().ok()
    }

    pub fn respond(&self, response: WorkerResponse) -> Result<(), ChannelError> {
        self.responses
            .send(response)
            .map_err(|_| ChannelError::Closed)
    }
}
