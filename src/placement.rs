//! Attempt-budgeted placement of interactable objects inside a room.
//!
//! Callers place objects one at a time and pass the growing list of
//! accepted bounding boxes into each call; a failed call leaves that
//! list untouched.

use tracing::{debug, trace, warn};

use crate::collision::{
    bounds_overlap, bounds_within_room, create_bounds, distance_to_point,
};
use crate::error::{SceneError, SceneResult};
use crate::materials::color_labels;
use crate::prng::Pcg32;
use crate::types::{
    BoundingBox, DebugInfo, ObjectDefinition, ObjectInstance,
    ObjectPlacementParams, Point2D, Show, Vector3d,
};

pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Minimum footprint distance between a placed object and the
/// performer's start position.
pub const PERFORMER_CLEARANCE: f64 = 0.5;

const ROTATION_GRANULARITY_DEG: u32 = 10;

/// An accepted position for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub position: Vector3d,
    pub rotation_y: f64,
    pub bounding_box: BoundingBox,
}

/// Draw one candidate. Consumes 3 PRNG values without candidates and
/// 2 with them.
fn sample_candidate(
    rng: &mut Pcg32,
    room: &Vector3d,
    candidates: &[Point2D],
) -> (f64, f64, f64) {
    let (x, z) = if candidates.is_empty() {
        (
            rng.next_range(-room.x / 2.0, room.x / 2.0),
            rng.next_range(-room.z / 2.0, room.z / 2.0),
        )
    } else {
        let c = candidates[rng.next_index(candidates.len())];
        (c.x, c.z)
    };
    let slots = 360 / ROTATION_GRANULARITY_DEG;
    let rot = (rng.next_int(0, slots - 1) * ROTATION_GRANULARITY_DEG) as f64;
    (x, z, rot)
}

/// Check a candidate box against the room, the performer and every
/// previously accepted box.
pub fn is_valid_location(
    bounds: &BoundingBox,
    room: &Vector3d,
    performer_start: &Point2D,
    existing: &[BoundingBox],
) -> bool {
    bounds_within_room(bounds, room)
        && distance_to_point(bounds, performer_start) > PERFORMER_CLEARANCE
        && !existing.iter().any(|other| bounds_overlap(bounds, other))
}

/// Find a valid location for `definition`, drawing from `candidates`
/// when given or sampling the whole room otherwise.
pub fn find_location(
    rng: &mut Pcg32,
    definition: &ObjectDefinition,
    room: &Vector3d,
    performer_start: &Point2D,
    existing: &[BoundingBox],
    candidates: &[Point2D],
) -> SceneResult<Location> {
    let standing_y = definition.standing_y();
    for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
        let (x, z, rotation_y) = sample_candidate(rng, room, candidates);
        let position = Vector3d::new(x, standing_y, z);
        let bounds = create_bounds(
            &definition.dimensions,
            &definition.offset,
            &position,
            rotation_y,
            standing_y,
        );
        if is_valid_location(&bounds, room, performer_start, existing) {
            debug!(
                object_type = %definition.object_type,
                attempt, x, z, rotation_y,
                "placed object"
            );
            return Ok(Location {
                position,
                rotation_y,
                bounding_box: bounds,
            });
        }
        trace!(attempt, x, z, rotation_y, "rejected candidate");
    }
    warn!(
        object_type = %definition.object_type,
        existing = existing.len(),
        "placement attempts exhausted"
    );
    Err(SceneError::PlacementExhausted {
        target: definition.object_type.clone(),
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// Place an object and build its instance record.
pub fn place_object(
    rng: &mut Pcg32,
    params: &ObjectPlacementParams,
    room: &Vector3d,
    performer_start: &Point2D,
    existing: &[BoundingBox],
) -> SceneResult<ObjectInstance> {
    let definition = &params.definition;
    let location = find_location(
        rng,
        definition,
        room,
        performer_start,
        existing,
        &params.candidates,
    )?;
    let materials: Vec<String> = params.material.iter().cloned().collect();
    let info = match &params.material {
        Some(m) => color_labels(m, &definition.object_type),
        None => vec![definition.object_type.clone()],
    };
    Ok(ObjectInstance {
        id: params.id.clone(),
        object_type: definition.object_type.clone(),
        materials,
        kinematic: !definition.moveable,
        structure: false,
        mass: definition.mass,
        debug: DebugInfo {
            dimensions: definition.dimensions,
            offset: definition.offset,
            position_y: definition.standing_y(),
            info,
        },
        shows: vec![Show {
            step_begin: 0,
            position: location.position,
            rotation: Vector3d::new(0.0, location.rotation_y, 0.0),
            scale: Vector3d::new(1.0, 1.0, 1.0),
            bounding_box: location.bounding_box,
        }],
        moves: vec![],
        rotates: vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_def() -> ObjectDefinition {
        ObjectDefinition {
            object_type: "crate".into(),
            dimensions: Vector3d::new(1.0, 0.5, 0.6),
            offset: Vector3d::ZERO,
            position_y: None,
            mass: 5.0,
            moveable: true,
        }
    }

    fn room() -> Vector3d {
        Vector3d::new(10.0, 3.0, 10.0)
    }

    #[test]
    fn deterministic() {
        let start = Point2D::new(0.0, -4.0);
        let run = || {
            let mut rng = Pcg32::new(11, 0);
            find_location(&mut rng, &crate_def(), &room(), &start, &[], &[])
                .expect("place")
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn sequential_placements_never_overlap() {
        let mut rng = Pcg32::new(42, 0);
        let start = Point2D::new(0.0, -4.5);
        let mut accepted: Vec<BoundingBox> = Vec::new();
        for _ in 0..20 {
            let loc = find_location(
                &mut rng,
                &crate_def(),
                &room(),
                &start,
                &accepted,
                &[],
            )
            .expect("room has space");
            assert!(bounds_within_room(&loc.bounding_box, &room()));
            let clearance = distance_to_point(&loc.bounding_box, &start);
            assert!(clearance > PERFORMER_CLEARANCE);
            accepted.push(loc.bounding_box);
        }
        for i in 0..accepted.len() {
            for j in (i + 1)..accepted.len() {
                assert!(
                    !bounds_overlap(&accepted[i], &accepted[j]),
                    "{i} and {j} overlap"
                );
            }
        }
    }

    #[test]
    fn filled_room_exhausts_budget() {
        // Four tiles cover a 4x4 room exactly; touching is not overlap.
        let small_room = Vector3d::new(4.0, 3.0, 4.0);
        let tile = |x: f64, z: f64| {
            create_bounds(
                &Vector3d::new(2.0, 3.0, 2.0),
                &Vector3d::ZERO,
                &Vector3d::new(x, 1.5, z),
                0.0,
                1.5,
            )
        };
        let tiles = vec![
            tile(-1.0, -1.0),
            tile(1.0, -1.0),
            tile(1.0, 1.0),
            tile(-1.0, 1.0),
        ];
        let mut rng = Pcg32::new(3, 0);
        let err = find_location(
            &mut rng,
            &crate_def(),
            &small_room,
            &Point2D::new(50.0, 50.0),
            &tiles,
            &[],
        )
        .expect_err("no free space");
        match err {
            SceneError::PlacementExhausted { target, attempts } => {
                assert_eq!(target, "crate");
                assert_eq!(attempts, MAX_PLACEMENT_ATTEMPTS);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn candidates_restrict_positions() {
        let candidates = [Point2D::new(2.0, 2.0), Point2D::new(-2.0, 3.0)];
        let mut rng = Pcg32::new(5, 0);
        for _ in 0..10 {
            let loc = find_location(
                &mut rng,
                &crate_def(),
                &room(),
                &Point2D::new(0.0, -4.0),
                &[],
                &candidates,
            )
            .expect("candidate fits");
            let p = Point2D::new(loc.position.x, loc.position.z);
            assert!(candidates.contains(&p));
            assert_eq!(loc.rotation_y % 10.0, 0.0);
        }
    }

    #[test]
    fn performer_start_is_kept_clear() {
        // The only candidate sits on the performer.
        let mut rng = Pcg32::new(5, 0);
        let result = find_location(
            &mut rng,
            &crate_def(),
            &room(),
            &Point2D::new(1.0, 1.0),
            &[],
            &[Point2D::new(1.0, 1.0)],
        );
        assert!(matches!(result, Err(SceneError::PlacementExhausted { .. })));
    }

    #[test]
    fn place_object_builds_instance() {
        let params = ObjectPlacementParams {
            id: "crate_1".into(),
            definition: crate_def(),
            material: Some("Custom/Materials/Azure".into()),
            candidates: vec![],
        };
        let mut rng = Pcg32::new(8, 0);
        let start = Point2D::new(0.0, -4.5);
        let inst = place_object(&mut rng, &params, &room(), &start, &[])
            .expect("place");
        assert_eq!(inst.id, "crate_1");
        assert_eq!(inst.object_type, "crate");
        assert_eq!(inst.materials, vec!["Custom/Materials/Azure".to_string()]);
        assert_eq!(inst.initial().position.y, 0.25);
        assert!(inst.debug.info.contains(&"azure blue crate".to_string()));
        assert!(inst.moves.is_empty());
        assert!(!inst.kinematic);
    }

    #[test]
    fn fixed_objects_are_kinematic() {
        let mut definition = crate_def();
        definition.moveable = false;
        let params = ObjectPlacementParams {
            id: "shelf".into(),
            definition,
            material: None,
            candidates: vec![],
        };
        let mut rng = Pcg32::new(8, 0);
        let start = Point2D::new(0.0, -4.5);
        let inst = place_object(&mut rng, &params, &room(), &start, &[])
            .expect("place");
        assert!(inst.kinematic);
        let json = serde_json::to_string(&inst).expect("serialize");
        assert!(json.contains("\"kinematic\":true"));
    }
}
