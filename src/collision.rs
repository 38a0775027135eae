//! Oriented bounding box (OBB) construction and collision checks.
//!
//! Footprints are rectangles on the XZ floor plane rotated about the
//! vertical axis only. Overlap uses the Separating Axis Theorem on the
//! footprints plus an interval test on the vertical extents.

use crate::types::{Axis, BoundingBox, Point2D, Vector3d};

pub type Corners = [Point2D; 4];

const SIGNS: [(f64, f64); 4] =
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Build the bounding box of an object with the given `dimensions`,
/// local `offset`, world `position` and Y rotation in degrees. The
/// footprint rotates about `position`; `standing_y` is the object's
/// vertical centre.
pub fn create_bounds(
    dimensions: &Vector3d,
    offset: &Vector3d,
    position: &Vector3d,
    rotation_y: f64,
    standing_y: f64,
) -> BoundingBox {
    let (sin_r, cos_r) = rotation_y.to_radians().sin_cos();
    let half_w = dimensions.x / 2.0;
    let half_d = dimensions.z / 2.0;
    let mut box_xz = [Point2D::default(); 4];
    for (i, &(sx, sz)) in SIGNS.iter().enumerate() {
        let lx = offset.x + sx * half_w;
        let lz = offset.z + sz * half_d;
        box_xz[i] = Point2D {
            x: position.x + lx * cos_r - lz * sin_r,
            z: position.z + lx * sin_r + lz * cos_r,
        };
    }
    BoundingBox {
        box_xz,
        max_y: standing_y + dimensions.y / 2.0,
        min_y: (standing_y - dimensions.y / 2.0).max(0.0),
    }
}

fn project(corners: &Corners, ax: f64, az: f64) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in corners {
        let dot = p.x * ax + p.z * az;
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

/// True if the interiors of two footprints overlap.
/// Touching (shared edge or corner) is NOT counted as overlap, and a
/// zero-area footprint never overlaps anything.
pub fn footprints_overlap(a: &Corners, b: &Corners) -> bool {
    for corners in [a, b] {
        // Opposite edges are parallel, two normals per box suffice.
        for i in 0..2 {
            let j = i + 1;
            let ex = corners[j].x - corners[i].x;
            let ez = corners[j].z - corners[i].z;
            let (ax, az) = (-ez, ex);
            let (min_a, max_a) = project(a, ax, az);
            let (min_b, max_b) = project(b, ax, az);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }
    true
}

/// Footprint overlap AND vertical overlap.
pub fn bounds_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.min_y < b.max_y
        && b.min_y < a.max_y
        && footprints_overlap(&a.box_xz, &b.box_xz)
}

/// True if all corners are within (or on) the room walls.
pub fn bounds_within_room(bounds: &BoundingBox, room: &Vector3d) -> bool {
    let half_w = room.x / 2.0;
    let half_d = room.z / 2.0;
    bounds
        .box_xz
        .iter()
        .all(|p| p.x.abs() <= half_w && p.z.abs() <= half_d)
}

/// Minimum and maximum corner coordinate along one floor axis.
pub fn extent_along(bounds: &BoundingBox, axis: Axis) -> (f64, f64) {
    bounds
        .box_xz
        .iter()
        .map(|p| axis.of(p))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn segment_distance(p: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    let (ex, ez) = (b.x - a.x, b.z - a.z);
    let len_sq = ex * ex + ez * ez;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * ex + (p.z - a.z) * ez) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cz) = (a.x + t * ex, a.z + t * ez);
    ((p.x - cx).powi(2) + (p.z - cz).powi(2)).sqrt()
}

fn contains_point(corners: &Corners, p: &Point2D) -> bool {
    // Convex polygon: inside iff on the same side of every edge.
    let mut sign = 0.0;
    for i in 0..4 {
        let a = &corners[i];
        let b = &corners[(i + 1) % 4];
        let cross = (b.x - a.x) * (p.z - a.z) - (b.z - a.z) * (p.x - a.x);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Distance from a floor point to the nearest part of the footprint;
/// zero when the point lies inside it.
pub fn distance_to_point(bounds: &BoundingBox, p: &Point2D) -> f64 {
    if contains_point(&bounds.box_xz, p) {
        return 0.0;
    }
    (0..4)
        .map(|i| {
            let corners = &bounds.box_xz;
            segment_distance(p, &corners[i], &corners[(i + 1) % 4])
        })
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::round_to;
    use proptest::prelude::*;

    fn flat(x: f64, z: f64, w: f64, d: f64, rot: f64) -> BoundingBox {
        create_bounds(
            &Vector3d::new(w, 1.0, d),
            &Vector3d::ZERO,
            &Vector3d::new(x, 0.5, z),
            rot,
            0.5,
        )
    }

    #[test]
    fn axis_aligned_corners() {
        let b = flat(1.0, 2.0, 2.0, 1.0, 0.0);
        assert_eq!(b.box_xz[0], Point2D::new(0.0, 1.5));
        assert_eq!(b.box_xz[1], Point2D::new(2.0, 1.5));
        assert_eq!(b.box_xz[2], Point2D::new(2.0, 2.5));
        assert_eq!(b.box_xz[3], Point2D::new(0.0, 2.5));
        assert_eq!(b.max_y, 1.0);
        assert_eq!(b.min_y, 0.0);
    }

    #[test]
    fn offset_shifts_before_rotation() {
        let b = create_bounds(
            &Vector3d::new(1.0, 1.0, 1.0),
            &Vector3d::new(1.0, 0.0, 0.0),
            &Vector3d::ZERO,
            90.0,
            0.5,
        );
        // Centre at local (1, 0) swings to (0, 1).
        let cx: f64 = b.box_xz.iter().map(|p| p.x).sum::<f64>() / 4.0;
        let cz: f64 = b.box_xz.iter().map(|p| p.z).sum::<f64>() / 4.0;
        assert!(cx.abs() < 1e-9);
        assert!((cz - 1.0).abs() < 1e-9);
    }

    #[test]
    fn elevated_vertical_extent() {
        let b = create_bounds(
            &Vector3d::new(0.1, 1.2, 0.1),
            &Vector3d::ZERO,
            &Vector3d::new(0.0, 2.4, 0.0),
            0.0,
            2.4,
        );
        assert!((b.max_y - 3.0).abs() < 1e-12);
        assert!((b.min_y - 1.8).abs() < 1e-12);
    }

    #[test]
    fn separated_no_overlap() {
        let a = flat(0.0, 0.0, 5.0, 2.5, 0.0);
        assert!(!bounds_overlap(&a, &flat(10.0, 0.0, 5.0, 2.5, 0.0)));
    }

    #[test]
    fn overlapping() {
        let a = flat(0.0, 0.0, 5.0, 2.5, 0.0);
        assert!(bounds_overlap(&a, &flat(3.0, 0.0, 5.0, 2.5, 0.0)));
    }

    #[test]
    fn touching_no_overlap() {
        let a = flat(0.0, 0.0, 5.0, 2.5, 0.0);
        assert!(!bounds_overlap(&a, &flat(5.0, 0.0, 5.0, 2.5, 0.0)));
        assert!(!bounds_overlap(&a, &flat(5.0, 2.5, 5.0, 2.5, 0.0)));
    }

    #[test]
    fn rotated_same_center_overlap() {
        let a = flat(0.0, 0.0, 5.0, 2.5, 0.0);
        assert!(bounds_overlap(&a, &flat(0.0, 0.0, 5.0, 2.5, 45.0)));
    }

    #[test]
    fn rotated_diamond_clears_corner() {
        // A unit square turned 45 degrees reaches 0.707 from its centre.
        let a = flat(0.0, 0.0, 1.0, 1.0, 0.0);
        let b = flat(1.3, 0.0, 1.0, 1.0, 45.0);
        assert!(!bounds_overlap(&a, &b));
        let c = flat(1.1, 0.0, 1.0, 1.0, 45.0);
        assert!(bounds_overlap(&a, &c));
    }

    #[test]
    fn vertical_separation_prevents_overlap() {
        let floor = flat(0.0, 0.0, 1.0, 1.0, 0.0);
        let above = create_bounds(
            &Vector3d::new(1.0, 1.0, 1.0),
            &Vector3d::ZERO,
            &Vector3d::new(0.0, 1.5, 0.0),
            0.0,
            1.5,
        );
        assert!(footprints_overlap(&floor.box_xz, &above.box_xz));
        assert!(!bounds_overlap(&floor, &above));
    }

    #[test]
    fn zero_area_never_overlaps() {
        let solid = flat(0.0, 0.0, 2.0, 2.0, 0.0);
        let point = flat(0.0, 0.0, 0.0, 0.0, 30.0);
        let sliver = flat(0.0, 0.0, 0.0, 1.0, 0.0);
        assert!(!bounds_overlap(&solid, &point));
        assert!(!bounds_overlap(&point, &solid));
        assert!(!bounds_overlap(&solid, &sliver));
        assert_eq!(distance_to_point(&point, &Point2D::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn room_containment() {
        let room = Vector3d::new(10.0, 3.0, 10.0);
        assert!(bounds_within_room(&flat(0.0, 0.0, 2.0, 2.0, 0.0), &room));
        assert!(bounds_within_room(&flat(4.0, 0.0, 2.0, 2.0, 0.0), &room));
        assert!(!bounds_within_room(&flat(4.5, 0.0, 2.0, 2.0, 0.0), &room));
        assert!(!bounds_within_room(&flat(4.0, 4.0, 2.0, 2.0, 45.0), &room));
    }

    #[test]
    fn extent_along_axis() {
        let b = flat(1.0, -1.0, 2.0, 4.0, 0.0);
        assert_eq!(extent_along(&b, Axis::X), (0.0, 2.0));
        assert_eq!(extent_along(&b, Axis::Z), (-3.0, 1.0));
    }

    #[test]
    fn point_distance() {
        let b = flat(0.0, 0.0, 2.0, 2.0, 0.0);
        assert_eq!(distance_to_point(&b, &Point2D::new(0.0, 0.0)), 0.0);
        assert_eq!(distance_to_point(&b, &Point2D::new(3.0, 0.0)), 2.0);
        let diagonal = distance_to_point(&b, &Point2D::new(4.0, 5.0));
        assert!((diagonal - 5.0).abs() < 1e-12);
        assert_eq!(distance_to_point(&b, &Point2D::new(1.0, 0.5)), 0.0);
    }

    proptest! {
        #[test]
        fn unrotating_corners_restores_rectangle(
            x in -5.0f64..5.0,
            z in -5.0f64..5.0,
            w in 0.0f64..4.0,
            d in 0.0f64..4.0,
            rot in -360.0f64..360.0,
        ) {
            let b = flat(x, z, w, d, rot);
            let (sin_r, cos_r) = (-rot).to_radians().sin_cos();
            for (i, &(sx, sz)) in SIGNS.iter().enumerate() {
                let dx = b.box_xz[i].x - x;
                let dz = b.box_xz[i].z - z;
                let ux = x + dx * cos_r - dz * sin_r;
                let uz = z + dx * sin_r + dz * cos_r;
                prop_assert!((ux - (x + sx * w / 2.0)).abs() < 1e-9);
                prop_assert!((uz - (z + sz * d / 2.0)).abs() < 1e-9);
            }
            prop_assert_eq!(round_to(b.max_y - b.min_y, 9), 1.0);
        }
    }
}
