//! Rotation and timing helpers shared by the occluder and tool code.

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Rotate `(point_x, point_z)` about `(origin_x, origin_z)` by `rotation`
/// degrees, counterclockwise in the XZ plane. Both coordinates are
/// rounded to 2 decimals.
pub fn rotate_point_around_origin(
    origin_x: f64,
    origin_z: f64,
    point_x: f64,
    point_z: f64,
    rotation: f64,
) -> (f64, f64) {
    let rad = rotation.to_radians();
    let (sin_r, cos_r) = rad.sin_cos();
    let dx = point_x - origin_x;
    let dz = point_z - origin_z;
    (
        round_to(origin_x + dx * cos_r - dz * sin_r, 2),
        round_to(origin_z + dx * sin_r + dz * cos_r, 2),
    )
}

// Upper size bound of each stair and its step length. Every step length
// divides 90 so a quarter turn splits into whole-degree increments.
const ROTATE_STEP_STAIRS: [(f64, u32); 8] = [
    (0.5, 2),
    (1.0, 3),
    (1.5, 5),
    (2.0, 6),
    (2.5, 9),
    (3.0, 10),
    (3.5, 15),
    (4.0, 18),
];

pub const MAX_ROTATE_STEP_LENGTH: u32 = 30;

/// Number of steps a 90 degree swing takes for an object of the given
/// width. Wider occluders swing more slowly.
pub fn find_rotate_step_length(size: f64) -> u32 {
    ROTATE_STEP_STAIRS
        .iter()
        .find(|&&(limit, _)| size < limit)
        .map_or(MAX_ROTATE_STEP_LENGTH, |&(_, steps)| steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quarter_turn_counterclockwise() {
        let rotate = |x, z| rotate_point_around_origin(0.0, 0.0, x, z, 90.0);
        assert_eq!(rotate(1.0, 0.0), (0.0, 1.0));
        assert_eq!(rotate(0.0, 1.0), (-1.0, 0.0));
    }

    #[test]
    fn rotates_about_offset_pivot() {
        let half_turn = rotate_point_around_origin(1.0, 2.0, 2.0, 2.0, 180.0);
        assert_eq!(half_turn, (0.0, 2.0));
        let clockwise =
            rotate_point_around_origin(-1.0, -1.0, 0.0, -1.0, -90.0);
        assert_eq!(clockwise, (-1.0, -2.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        let (x, z) = rotate_point_around_origin(0.0, 0.0, 1.0, 0.0, 45.0);
        assert_eq!(x, 0.71);
        assert_eq!(z, 0.71);
    }

    #[test]
    fn zero_rotation_and_degenerate_point() {
        let pivot = rotate_point_around_origin(3.0, 4.0, 3.0, 4.0, 137.0);
        assert_eq!(pivot, (3.0, 4.0));
        let unrotated = rotate_point_around_origin(0.0, 0.0, 2.5, -1.25, 0.0);
        assert_eq!(unrotated, (2.5, -1.25));
    }

    #[test]
    fn step_length_literals() {
        assert_eq!(find_rotate_step_length(0.25), 2);
        assert_eq!(find_rotate_step_length(0.5), 3);
        assert_eq!(find_rotate_step_length(1.0), 5);
        assert_eq!(find_rotate_step_length(1.5), 6);
        assert_eq!(find_rotate_step_length(2.0), 9);
        assert_eq!(find_rotate_step_length(3.0), 15);
        assert_eq!(find_rotate_step_length(4.0), 30);
        assert_eq!(find_rotate_step_length(12.0), 30);
    }

    #[test]
    fn step_length_divides_ninety() {
        let mut last = 0;
        for i in 1..=50 {
            let size = i as f64 * 0.1;
            let steps = find_rotate_step_length(size);
            assert!((2..=30).contains(&steps), "size {size} -> {steps}");
            assert_eq!(90 % steps, 0, "size {size} -> {steps}");
            assert!(steps >= last, "not monotonic at {size}");
            last = steps;
        }
    }

    proptest! {
        #[test]
        fn rotation_involution(
            ox in -5.0f64..5.0,
            oz in -5.0f64..5.0,
            px in -5.0f64..5.0,
            pz in -5.0f64..5.0,
            angle in -360.0f64..360.0,
        ) {
            let (rx, rz) = rotate_point_around_origin(ox, oz, px, pz, angle);
            let (bx, bz) = rotate_point_around_origin(ox, oz, rx, rz, -angle);
            // Two roundings of at most 0.005 each, the first one rotated.
            prop_assert!((bx - px).abs() <= 0.0125, "x {} vs {}", bx, px);
            prop_assert!((bz - pz).abs() <= 0.0125, "z {} vs {}", bz, pz);
        }
    }
}
