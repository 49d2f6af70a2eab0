use crate::enums::{AnatomicalAxis, RotationDirection};
use crate::geometry::clamp;
use crate::state::ViewerState;

/// User input translated into a state-mutation intent. Applying an
/// intent is a pure transform; the caller replaces the previous state
/// with the returned aggregate.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlIntent {
    SelectAxis(AnatomicalAxis),
    SetCoordinate { axis: AnatomicalAxis, value: u32 },
    SetWindowLevel(f32),
    SetWindowWidth(f32),
    InvertPolarity,
    Rotate(RotationDirection),
    /// One wheel tick with the native scroll delta. Sign is inverted:
    /// scroll up (negative delta) increases the coordinate on the
    /// selected axis. Out-of-range ticks are silently absorbed.
    WheelTick { delta: f64 },
}

pub fn apply(state: &ViewerState, intent: ControlIntent) -> ViewerState {
    let state = state.clone();
    match intent {
        ControlIntent::SelectAxis(axis) => state.with_axis(axis),
        ControlIntent::SetCoordinate { axis, value } => {
            let bound = state.dimensions.along(axis).saturating_sub(1);
            state.with_coordinate(axis, clamp(0, bound, value))
        }
        ControlIntent::SetWindowLevel(value) => {
            let level = value.clamp(0.0, state.window.maximum);
            state.with_window_level(level)
        }
        ControlIntent::SetWindowWidth(value) => {
            let width = value.clamp(0.0, state.window.maximum);
            state.with_window_width(width)
        }
        ControlIntent::InvertPolarity => state.with_inverted_polarity(),
        ControlIntent::Rotate(direction) => {
            let rotation = match direction {
                RotationDirection::Clockwise => state.rotation.incremented(),
                RotationDirection::CounterClockwise => state.rotation.decremented(),
            };
            state.with_rotation(rotation)
        }
        ControlIntent::WheelTick { delta } => {
            let axis = state.axis;
            let current = state.focal_point.coordinate(axis);
            let bound = state.dimensions.along(axis).saturating_sub(1);
            let next = match delta.partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Less) => current.saturating_add(1).min(bound),
                Some(std::cmp::Ordering::Greater) => current.saturating_sub(1),
                _ => current,
            };
            state.with_coordinate(axis, next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DisplayPolarity, Rotation};
    use crate::geometry::VolumeDimensions;
    use crate::state::VolumeProperties;

    fn state() -> ViewerState {
        ViewerState::new(&VolumeProperties {
            dimensions: VolumeDimensions {
                rows: 10,
                columns: 12,
                slices: 8,
                timepoints: 1,
            },
            maximum: 255.0,
        })
    }

    #[test]
    fn set_coordinate_clamps_to_dimension_bounds() {
        let next = apply(
            &state(),
            ControlIntent::SetCoordinate {
                axis: AnatomicalAxis::Axial,
                value: 100,
            },
        );
        assert_eq!(next.focal_point.z, 7);
    }

    #[test]
    fn window_intents_clamp_to_intensity_maximum() {
        let next = apply(&state(), ControlIntent::SetWindowLevel(1000.0));
        assert_eq!(next.window.level, 255.0);
        let next = apply(&next, ControlIntent::SetWindowWidth(-3.0));
        assert_eq!(next.window.width, 0.0);
    }

    #[test]
    fn wheel_up_increases_and_clamps_at_upper_bound() {
        // Scroll up reports a negative native delta.
        let mut current = state();
        for _ in 0..3 {
            current = apply(&current, ControlIntent::WheelTick { delta: -1.0 });
        }
        assert_eq!(current.focal_point.z, 7);

        // A fourth tick is absorbed at the bound, no wraparound.
        let absorbed = apply(&current, ControlIntent::WheelTick { delta: -1.0 });
        assert_eq!(absorbed.focal_point.z, 7);
    }

    #[test]
    fn wheel_down_decreases_and_clamps_at_zero() {
        let mut current = state();
        for _ in 0..10 {
            current = apply(&current, ControlIntent::WheelTick { delta: 1.0 });
        }
        assert_eq!(current.focal_point.z, 0);
    }

    #[test]
    fn wheel_follows_the_selected_axis() {
        let coronal = apply(&state(), ControlIntent::SelectAxis(AnatomicalAxis::Coronal));
        let next = apply(&coronal, ControlIntent::WheelTick { delta: -1.0 });
        assert_eq!(next.focal_point.y, 7);
        assert_eq!(next.focal_point.z, coronal.focal_point.z);
    }

    #[test]
    fn rotate_and_invert_go_through_the_pure_helpers() {
        let next = apply(&state(), ControlIntent::Rotate(RotationDirection::Clockwise));
        assert_eq!(next.rotation, Rotation::Rotate90);
        let next = apply(
            &next,
            ControlIntent::Rotate(RotationDirection::CounterClockwise),
        );
        assert_eq!(next.rotation, Rotation::Rotate0);
        let next = apply(&next, ControlIntent::InvertPolarity);
        assert_eq!(next.window.polarity, DisplayPolarity::Negative);
    }
}
