//! Occluder construction: a wall plus the pole that carries it, and the
//! keyframe schedule that lifts, swings and lowers them.
//!
//! With `R = find_rotate_step_length(width)` the opening cycle is:
//!
//! ```text
//! move 1     1 ..= 6            lift
//! rotate 1   7 ..= 6+R          quarter turn
//! rotate 2   9+R ..= 8+2R       quarter turn back
//! move 2     11+2R ..= 16+2R    lower
//! ```
//!
//! When a last step `L` is given a closing phase lifts again at
//! `L - 2R - 4` and swings open so the turn completes at `L`.

use tracing::{debug, warn};

use crate::collision::create_bounds;
use crate::error::{SceneError, SceneResult};
use crate::materials::color_labels;
use crate::math::{find_rotate_step_length, round_to};
use crate::prng::Pcg32;
use crate::types::{
    Axis, DebugInfo, KeyframeSegment, ObjectInstance, Occluder,
    OccluderParams, Show, SidewaysMode, Vector3d,
};

pub const OCCLUDER_MOVE_STEPS: u32 = 6;
pub const OCCLUDER_LIFT_PER_STEP: f64 = 0.25;

/// Minimum gap between the walls of neighbouring occluders.
pub const OCCLUDER_SEPARATION_X: f64 = 0.5;

pub const MAX_OCCLUDER_POSITION_ATTEMPTS: u32 = 100;

/// Half the width of the default 10x10 room.
pub const DEFAULT_ROOM_HALF_WIDTH: f64 = 5.0;

const OCCLUDER_WALL_MASS: f64 = 100.0;
const OCCLUDER_POLE_MASS: f64 = 10.0;
const POLE_DIAMETER: f64 = 0.1;

// Steps held still between the swing phases of the opening cycle.
const SWING_PAUSE_STEPS: u32 = 2;

// -- Positioning ---------------------------------------------------

/// Gap between two occluder walls along X beyond the required
/// separation. Negative when they are too close.
pub fn calculate_separation_distance(
    x_a: f64,
    width_a: f64,
    x_b: f64,
    width_b: f64,
) -> f64 {
    (x_b - x_a).abs() - (width_a + width_b) / 2.0 - OCCLUDER_SEPARATION_X
}

/// X position for a new occluder that keeps its separation from every
/// existing one.
pub fn generate_occluder_position(
    rng: &mut Pcg32,
    occluder_width: f64,
    existing: &[Occluder],
    room_half_width: f64,
) -> SceneResult<f64> {
    let max_x = room_half_width - occluder_width / 2.0;
    if max_x < 0.0 {
        return Err(SceneError::config(
            "occluder_width",
            format!("{occluder_width} is wider than the room"),
        ));
    }
    for attempt in 0..MAX_OCCLUDER_POSITION_ATTEMPTS {
        let x = round_to(rng.next_range(-max_x, max_x), 2)
            .clamp(-max_x, max_x);
        let clear = existing.iter().all(|o| {
            let wall = o.wall.initial();
            calculate_separation_distance(
                wall.position.x,
                wall.scale.x,
                x,
                occluder_width,
            ) >= 0.0
        });
        if clear {
            debug!(attempt, x, occluder_width, "occluder position");
            return Ok(x);
        }
    }
    warn!(
        occluder_width,
        existing = existing.len(),
        "occluder positions exhausted"
    );
    Err(SceneError::PlacementExhausted {
        target: "occluder".into(),
        attempts: MAX_OCCLUDER_POSITION_ATTEMPTS,
    })
}

fn midpoint(wall_edge: f64, room_edge: f64) -> f64 {
    round_to((wall_edge + room_edge) / 2.0, 2)
}

/// Centre X of a sideways pole spanning from the wall's side edge to
/// the room wall on the pole's side.
pub fn generate_sideways_pole_position_x(
    x_position: f64,
    occluder_width: f64,
    pole_on_left: bool,
    room_half_width: f64,
) -> f64 {
    if pole_on_left {
        midpoint(x_position - occluder_width / 2.0, -room_half_width)
    } else {
        midpoint(x_position + occluder_width / 2.0, room_half_width)
    }
}

/// Centre Z of a sideways pole spanning from the wall's face to the
/// front or back room wall.
pub fn generate_sideways_pole_position_z(
    z_position: f64,
    occluder_thickness: f64,
    pole_in_back: bool,
    room_half_depth: f64,
) -> f64 {
    if pole_in_back {
        midpoint(z_position - occluder_thickness / 2.0, -room_half_depth)
    } else {
        midpoint(z_position + occluder_thickness / 2.0, room_half_depth)
    }
}

// -- Schedule ------------------------------------------------------

/// Step at which the lowering move of the opening cycle starts.
pub fn move_2_step_begin(step_length: u32) -> u32 {
    OCCLUDER_MOVE_STEPS + 1 + 2 * step_length + 2 * SWING_PAUSE_STEPS
}

fn cycle_end(step_length: u32) -> u32 {
    move_2_step_begin(step_length) + OCCLUDER_MOVE_STEPS - 1
}

/// Step at which the closing lift starts for a given last step.
pub fn final_move_step_begin(last_step: u32, step_length: u32) -> u32 {
    last_step.saturating_sub(2 * (step_length + SWING_PAUSE_STEPS))
}

/// Earliest last step whose closing lift starts at step 1 or later.
pub fn min_last_step(step_length: u32) -> u32 {
    2 * (step_length + SWING_PAUSE_STEPS) + 1
}

/// Reject schedules whose steps fall outside the step counter. A
/// closing phase that overlaps the opening cycle is only logged.
fn check_schedule(
    params: &OccluderParams,
    step_length: u32,
) -> SceneResult<()> {
    match (params.repeat_movement, params.last_step) {
        (Some(interval), _) => {
            if cycle_end(step_length).checked_add(interval).is_none() {
                return Err(SceneError::config(
                    "repeat_movement",
                    format!("interval {interval} overflows the step counter"),
                ));
            }
        }
        (None, Some(last)) => {
            let min = min_last_step(step_length);
            if last < min {
                return Err(SceneError::config(
                    "last_step",
                    format!("{last} is earlier than the minimum {min}"),
                ));
            }
            let final_begin = final_move_step_begin(last, step_length);
            if final_begin <= cycle_end(step_length) {
                warn!(
                    id = %params.id,
                    last_step = last,
                    final_begin,
                    "closing phase starts before the opening cycle ends"
                );
            }
        }
        (None, None) => {}
    }
    Ok(())
}

fn swing(step_length: u32, sign: f64) -> Vector3d {
    Vector3d::new(0.0, sign * 90.0 / step_length as f64, 0.0)
}

fn negate(v: Vector3d) -> Vector3d {
    Vector3d::new(-v.x, -v.y, -v.z)
}

/// Mark every segment as repeating so the whole opening cycle replays
/// `interval` steps after it ends.
fn apply_repeat(
    segments: &mut [KeyframeSegment],
    cycle_end: u32,
    interval: u32,
) {
    for seg in segments {
        seg.repeat = true;
        seg.step_wait = Some(cycle_end - seg.length() + interval);
    }
}

/// Translation schedule shared by the wall and the pole.
fn move_segments(
    lift: Vector3d,
    step_length: u32,
    last_step: Option<u32>,
    repeat_movement: Option<u32>,
) -> Vec<KeyframeSegment> {
    let move_2 = move_2_step_begin(step_length);
    let mut moves = vec![
        KeyframeSegment::new(1, OCCLUDER_MOVE_STEPS, lift),
        KeyframeSegment::new(
            move_2,
            move_2 + OCCLUDER_MOVE_STEPS - 1,
            negate(lift),
        ),
    ];
    if let Some(interval) = repeat_movement {
        apply_repeat(&mut moves, cycle_end(step_length), interval);
    } else if let Some(last) = last_step {
        let begin = final_move_step_begin(last, step_length);
        moves.push(KeyframeSegment::new(
            begin,
            begin + OCCLUDER_MOVE_STEPS - 1,
            lift,
        ));
    }
    moves
}

/// Rotation schedule for one swing direction.
fn rotate_segments(
    sign: f64,
    step_length: u32,
    last_step: Option<u32>,
    repeat_movement: Option<u32>,
) -> Vec<KeyframeSegment> {
    let open = OCCLUDER_MOVE_STEPS + 1;
    let close = open + step_length + SWING_PAUSE_STEPS;
    let mut rotates = vec![
        KeyframeSegment::new(
            open,
            open + step_length - 1,
            swing(step_length, sign),
        ),
        KeyframeSegment::new(
            close,
            close + step_length - 1,
            swing(step_length, -sign),
        ),
    ];
    if let Some(interval) = repeat_movement {
        apply_repeat(&mut rotates, cycle_end(step_length), interval);
    } else if let Some(last) = last_step {
        rotates.push(KeyframeSegment::new(
            last + 1 - step_length,
            last,
            swing(step_length, sign),
        ));
    }
    rotates
}

// -- Construction --------------------------------------------------

struct PoleLayout {
    position: Vector3d,
    rotation: Vector3d,
    scale: Vector3d,
    // World-space extents, for the bounding box.
    dimensions: Vector3d,
    lift: Vector3d,
    swing_sign: f64,
}

fn vertical_pole(params: &OccluderParams) -> PoleLayout {
    let height = params.occluder_height;
    let length = (params.room_dimensions.y - height).max(0.0);
    let dims = Vector3d::new(POLE_DIAMETER, length, POLE_DIAMETER);
    PoleLayout {
        position: Vector3d::new(
            params.x_position,
            height + length / 2.0,
            params.z_position,
        ),
        rotation: Vector3d::ZERO,
        scale: dims,
        dimensions: dims,
        lift: Vector3d::new(0.0, OCCLUDER_LIFT_PER_STEP, 0.0),
        swing_sign: if params.x_position < 0.0 { -1.0 } else { 1.0 },
    }
}

fn sideways_pole(params: &OccluderParams, mode: SidewaysMode) -> PoleLayout {
    let direction = mode.direction();
    let sign = direction.sign();
    let y = params.occluder_height / 2.0;
    let swing_sign = match mode {
        SidewaysMode::Left | SidewaysMode::Front => 1.0,
        SidewaysMode::Right | SidewaysMode::Back => -1.0,
    };
    let lift = sign * OCCLUDER_LIFT_PER_STEP;
    match direction.axis() {
        Axis::X => {
            let half = Axis::X.half_extent(&params.room_dimensions);
            let wall_edge =
                params.x_position + sign * params.occluder_width / 2.0;
            let length = (sign * half - wall_edge).abs();
            let x = generate_sideways_pole_position_x(
                params.x_position,
                params.occluder_width,
                mode == SidewaysMode::Left,
                half,
            );
            PoleLayout {
                position: Vector3d::new(x, y, params.z_position),
                rotation: Vector3d::new(0.0, 0.0, 90.0),
                scale: Vector3d::new(POLE_DIAMETER, length, POLE_DIAMETER),
                dimensions: Vector3d::new(
                    length,
                    POLE_DIAMETER,
                    POLE_DIAMETER,
                ),
                lift: Vector3d::new(lift, 0.0, 0.0),
                swing_sign,
            }
        }
        Axis::Z => {
            let half = Axis::Z.half_extent(&params.room_dimensions);
            let wall_edge =
                params.z_position + sign * params.occluder_thickness / 2.0;
            let length = (sign * half - wall_edge).abs();
            let z = generate_sideways_pole_position_z(
                params.z_position,
                params.occluder_thickness,
                mode == SidewaysMode::Back,
                half,
            );
            PoleLayout {
                position: Vector3d::new(params.x_position, y, z),
                rotation: Vector3d::new(90.0, 0.0, 0.0),
                scale: Vector3d::new(POLE_DIAMETER, length, POLE_DIAMETER),
                dimensions: Vector3d::new(
                    POLE_DIAMETER,
                    POLE_DIAMETER,
                    length,
                ),
                lift: Vector3d::new(0.0, 0.0, lift),
                swing_sign,
            }
        }
    }
}

/// Build the wall and pole of one occluder with their full schedules.
///
/// Fails with a `Config` error when `last_step` is earlier than
/// `min_last_step` or `repeat_movement` would push a step past
/// `u32::MAX`.
pub fn create_occluder(params: &OccluderParams) -> SceneResult<Occluder> {
    let step_length = find_rotate_step_length(params.occluder_width);
    check_schedule(params, step_length)?;
    let pole = match params.sideways {
        None => vertical_pole(params),
        Some(mode) => sideways_pole(params, mode),
    };
    let wall_sign = if params.reverse_direction {
        -pole.swing_sign
    } else {
        pole.swing_sign
    };

    let repeat = params.repeat_movement;
    let last_step = params.last_step;
    let moves = move_segments(pole.lift, step_length, last_step, repeat);
    debug!(
        id = %params.id,
        step_length,
        move_2_begin = move_2_step_begin(step_length),
        sideways = ?params.sideways,
        "occluder schedule"
    );

    let height = params.occluder_height;
    let wall_dims = Vector3d::new(
        params.occluder_width,
        height,
        params.occluder_thickness,
    );
    let wall_position =
        Vector3d::new(params.x_position, height / 2.0, params.z_position);
    let wall = ObjectInstance {
        id: format!("{}_wall", params.id),
        object_type: "cube".into(),
        materials: vec![params.wall_material.clone()],
        kinematic: true,
        structure: true,
        mass: OCCLUDER_WALL_MASS,
        debug: DebugInfo {
            dimensions: wall_dims,
            offset: Vector3d::ZERO,
            position_y: height / 2.0,
            info: color_labels(&params.wall_material, "occluder"),
        },
        shows: vec![Show {
            step_begin: 0,
            position: wall_position,
            rotation: Vector3d::ZERO,
            scale: wall_dims,
            bounding_box: create_bounds(
                &wall_dims,
                &Vector3d::ZERO,
                &wall_position,
                0.0,
                height / 2.0,
            ),
        }],
        moves: moves.clone(),
        rotates: rotate_segments(wall_sign, step_length, last_step, repeat),
    };

    let pole_instance = ObjectInstance {
        id: format!("{}_pole", params.id),
        object_type: "cylinder".into(),
        materials: vec![params.pole_material.clone()],
        kinematic: true,
        structure: true,
        mass: OCCLUDER_POLE_MASS,
        debug: DebugInfo {
            dimensions: pole.dimensions,
            offset: Vector3d::ZERO,
            position_y: pole.position.y,
            info: color_labels(&params.pole_material, "pole"),
        },
        shows: vec![Show {
            step_begin: 0,
            position: pole.position,
            rotation: pole.rotation,
            scale: pole.scale,
            bounding_box: create_bounds(
                &pole.dimensions,
                &Vector3d::ZERO,
                &pole.position,
                0.0,
                pole.position.y,
            ),
        }],
        moves,
        rotates: rotate_segments(
            pole.swing_sign,
            step_length,
            last_step,
            repeat,
        ),
    };

    Ok(Occluder {
        wall,
        pole: pole_instance,
    })
}
