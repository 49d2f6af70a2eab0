//! # Slice-viewer library
//!
//! This crate provides the client-side orchestration layer of an
//! interactive volumetric viewer for medical imaging data.
//!
//! It owns the authoritative view state (anatomical axis, focal
//! coordinate, display windowing, rotation) and coordinates the
//! asynchronous rendering of 2D slices extracted from a 3D/4D voxel
//! volume. Decoding and rendering are delegated to an isolated worker
//! reached through a message channel; the actual file parser and
//! rendering engine plug in behind traits. Slices can be viewed along
//! the three medical axes:
//!  - Axial
//!  - Coronal
//!  - Sagittal
//!
//! The orchestration guarantees that render requests always reflect the
//! latest state, that a request formed before the renderer's readiness
//! acknowledgment is retained and flushed after it (never dropped, never
//! guessed with a timer), and that bursts of rapid changes coalesce to
//! the most recent geometry. Responses to superseded decode requests are
//! discarded via per-kind request-id correlation.
//!
//!  Contributions are highly welcome!
//!
//! # Examples
//!
//! ## Seeding a view state from decoded volume properties
//!
//! The focal point starts at the rounded center of each dimension, the
//! display window at 25% level and 50% width of the intensity maximum.
//!
//! ```
//! # use slice_viewer::geometry::VolumeDimensions;
//! # use slice_viewer::state::{ViewerState, VolumeProperties};
//! let properties = VolumeProperties {
//!     dimensions: VolumeDimensions {
//!         rows: 10,
//!         columns: 12,
//!         slices: 8,
//!         timepoints: 1,
//!     },
//!     maximum: 255.0,
//! };
//! let state = ViewerState::new(&properties);
//! assert_eq!(state.focal_point.z, 4);
//! assert!(!state.renderer_ready);
//! ```

pub mod channel;
pub mod controls;
pub mod coordinator;
pub mod enums;
pub mod geometry;
pub mod loader;
pub mod state;
pub mod surface;
pub mod viewer;
pub mod worker;

pub use channel::{RenderPort, SliceGeometry, WorkerChannel};
pub use controls::ControlIntent;
pub use enums::{AnatomicalAxis, DisplayPolarity, Rotation, RotationDirection};
pub use loader::{DemoFile, FileLoader, LoadProgress, LoadedFile};
pub use state::{DisplayWindow, ViewerState, VolumeProperties};
pub use surface::DrawableSurface;
pub use viewer::Viewer;
pub use worker::{RenderWorker, SliceRenderer, VolumeDecoder};
