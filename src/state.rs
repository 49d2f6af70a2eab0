use serde::{Deserialize, Serialize};

use crate::enums::{AnatomicalAxis, DisplayPolarity, Rotation};
use crate::geometry::{VolumeDimensions, VoxelPoint};

/// Volume metadata reported by the decoder once a file has been read.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeProperties {
    pub dimensions: VolumeDimensions,
    pub maximum: f32,
}

/// Intensity-to-display mapping parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub maximum: f32,
    pub level: f32,
    pub width: f32,
    pub polarity: DisplayPolarity,
}

impl DisplayWindow {
    /// Lowest intensity mapped by this window.
    pub fn min(&self) -> f32 {
        self.level - self.width / 2.0
    }

    /// Highest intensity mapped by this window.
    pub fn max(&self) -> f32 {
        self.level + self.width / 2.0
    }
}

/// Authoritative view state of one viewer instance.
///
/// The aggregate is always replaced wholesale: every update helper is a
/// pure transform returning a new value, so consumers can diff with
/// `PartialEq` and never observe a half-updated combination.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    pub dimensions: VolumeDimensions,
    pub focal_point: VoxelPoint,
    pub axis: AnatomicalAxis,
    pub window: DisplayWindow,
    pub rotation: Rotation,
    pub renderer_ready: bool,
}

fn centered(dimension: u32) -> u32 {
    // round(dimension / 2), kept below the upper bound for degenerate
    // single-sample axes.
    ((dimension as f32 / 2.0).round() as u32).min(dimension.saturating_sub(1))
}

impl ViewerState {
    /// Seed a fresh state from decoded volume properties: focal point at
    /// the rounded geometric center, axial view, no rotation, window
    /// level at 25% and width at 50% of the intensity maximum.
    pub fn new(properties: &VolumeProperties) -> Self {
        let dimensions = properties.dimensions;
        Self {
            dimensions,
            focal_point: VoxelPoint {
                x: centered(dimensions.rows),
                y: centered(dimensions.columns),
                z: centered(dimensions.slices),
                t: 0,
            },
            axis: AnatomicalAxis::Axial,
            window: DisplayWindow {
                maximum: properties.maximum,
                level: (properties.maximum * 0.25).round(),
                width: (properties.maximum * 0.5).round(),
                polarity: DisplayPolarity::Positive,
            },
            rotation: Rotation::Rotate0,
            renderer_ready: false,
        }
    }

    pub fn with_axis(self, axis: AnatomicalAxis) -> Self {
        Self { axis, ..self }
    }

    /// Replace the focal coordinate along the given axis. Bounds are the
    /// caller's concern; control intents clamp before calling this.
    pub fn with_coordinate(self, axis: AnatomicalAxis, coordinate: u32) -> Self {
        Self {
            focal_point: self.focal_point.with_coordinate(axis, coordinate),
            ..self
        }
    }

    pub fn with_window_level(self, level: f32) -> Self {
        Self {
            window: DisplayWindow { level, ..self.window },
            ..self
        }
    }

    pub fn with_window_width(self, width: f32) -> Self {
        Self {
            window: DisplayWindow { width, ..self.window },
            ..self
        }
    }

    pub fn with_inverted_polarity(self) -> Self {
        Self {
            window: DisplayWindow {
                polarity: self.window.polarity.inverted(),
                ..self.window
            },
            ..self
        }
    }

    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_renderer_ready(self, renderer_ready: bool) -> Self {
        Self {
            renderer_ready,
            ..self
        }
    }
}
