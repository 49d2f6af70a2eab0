use serde::{Deserialize, Serialize};

/// Anatomical viewing plane. Selects which volume axis acts as the
/// slice depth axis:
///  - Axial: z (slices)
///  - Coronal: y (columns)
///  - Sagittal: x (rows)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnatomicalAxis {
    Axial,
    Coronal,
    Sagittal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayPolarity {
    #[default]
    Positive,
    Negative,
}

impl DisplayPolarity {
    /// Invert the intensity mapping. Involution: applying twice returns
    /// the original polarity.
    pub fn inverted(self) -> Self {
        match self {
            DisplayPolarity::Positive => DisplayPolarity::Negative,
            DisplayPolarity::Negative => DisplayPolarity::Positive,
        }
    }
}

/// In-plane display rotation in 90-degree steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    /// Next rotation clockwise. Four applications form a cycle.
    pub fn incremented(self) -> Self {
        match self {
            Rotation::Rotate0 => Rotation::Rotate90,
            Rotation::Rotate90 => Rotation::Rotate180,
            Rotation::Rotate180 => Rotation::Rotate270,
            Rotation::Rotate270 => Rotation::Rotate0,
        }
    }

    /// Previous rotation, inverse of [`Rotation::incremented`].
    pub fn decremented(self) -> Self {
        match self {
            Rotation::Rotate0 => Rotation::Rotate270,
            Rotation::Rotate90 => Rotation::Rotate0,
            Rotation::Rotate180 => Rotation::Rotate90,
            Rotation::Rotate270 => Rotation::Rotate180,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}
