use serde::{Deserialize, Serialize};

use crate::enums::AnatomicalAxis;

/// Extent of the loaded volume, fixed once the file is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDimensions {
    pub rows: u32,
    pub columns: u32,
    pub slices: u32,
    pub timepoints: u32,
}

impl VolumeDimensions {
    /// Extent along the depth axis implied by the anatomical axis.
    pub fn along(&self, axis: AnatomicalAxis) -> u32 {
        match axis {
            AnatomicalAxis::Axial => self.slices,
            AnatomicalAxis::Coronal => self.columns,
            AnatomicalAxis::Sagittal => self.rows,
        }
    }
}

/// Focal coordinate inside the volume, bounded per-axis by the
/// corresponding dimension minus one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelPoint {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub t: u32,
}

impl VoxelPoint {
    /// Project the coordinate along the depth axis implied by the
    /// anatomical axis.
    pub fn coordinate(&self, axis: AnatomicalAxis) -> u32 {
        match axis {
            AnatomicalAxis::Axial => self.z,
            AnatomicalAxis::Coronal => self.y,
            AnatomicalAxis::Sagittal => self.x,
        }
    }

    /// Inject a coordinate along the depth axis implied by the anatomical
    /// axis, leaving the other components unchanged.
    pub fn with_coordinate(self, axis: AnatomicalAxis, coordinate: u32) -> Self {
        match axis {
            AnatomicalAxis::Axial => Self {
                z: coordinate,
                ..self
            },
            AnatomicalAxis::Coronal => Self {
                y: coordinate,
                ..self
            },
            AnatomicalAxis::Sagittal => Self {
                x: coordinate,
                ..self
            },
        }
    }
}

/// Clamp `value` into `[min, max]`. Identity whenever the value is
/// already in range.
pub fn clamp(min: u32, max: u32, value: u32) -> u32 {
    value.max(min).min(max)
}
