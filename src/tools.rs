//! Tool placement: single tools, broken tools scattered in pieces, and
//! inaccessible tools fenced off by a blocking wall.
//!
//! A tool lies on the floor with its length along local Z. Rotation 0
//! therefore points a tool front/back; 90 points it left/right.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::{create_bounds, extent_along};
use crate::error::{SceneError, SceneResult};
use crate::materials::color_labels;
use crate::math::rotate_point_around_origin;
use crate::prng::Pcg32;
use crate::types::{
    Axis, BoundingBox, BrokenToolParams, DebugInfo, Direction,
    InaccessibleTool, InaccessibleToolParams, ObjectInstance, Show,
    ToolParams, Vector3d,
};

pub const TOOL_HEIGHT: f64 = 0.3;
pub const TOOL_WIDTHS: [f64; 3] = [0.5, 0.75, 1.0];
pub const TOOL_LENGTHS: [f64; 10] =
    [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
pub const SMALL_TOOL_LENGTH: f64 = 1.0;

/// Gap along the long axis between consecutive broken-tool pieces.
pub const BROKEN_TOOL_VERTICAL_SEPARATION: f64 = 0.5;
/// Maximum sideways jitter of a broken-tool piece.
pub const BROKEN_TOOL_HORIZONTAL_JITTER: f64 = 0.5;

pub const MIN_BLOCKING_WALL_SEPARATION: f64 = 0.5;
pub const BLOCKING_WALL_THICKNESS: f64 = 0.1;
pub const BLOCKING_WALL_HEIGHT: f64 = 1.0;
const BLOCKING_WALL_MASS: f64 = 100.0;

// -- Shapes --------------------------------------------------------

/// What a scene asks for; several categories share a shape family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Rect,
    Hooked,
    Small,
    Broken,
    Inaccessible,
    Isosceles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolShapeKind {
    Rect,
    Hooked,
    Isosceles,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolShape {
    pub kind: ToolShapeKind,
    pub width: f64,
    pub length: f64,
}

fn dimension_label(value: f64) -> String {
    format!("{value:.2}").replace('.', "_")
}

impl ToolShape {
    pub fn name(&self) -> String {
        match self.kind {
            ToolShapeKind::Rect => format!(
                "tool_rect_{}_x_{}",
                dimension_label(self.width),
                dimension_label(self.length)
            ),
            ToolShapeKind::Hooked => format!(
                "tool_hooked_{}_x_{}",
                dimension_label(self.width),
                dimension_label(self.length)
            ),
            ToolShapeKind::Isosceles => {
                format!("tool_isosceles_{}", dimension_label(self.length))
            }
        }
    }

    /// Footprint as (across, along) the tool's length.
    pub fn footprint(&self) -> (f64, f64) {
        match self.kind {
            ToolShapeKind::Rect => (self.width, self.length),
            // Shaft plus a hook two shaft-widths long.
            ToolShapeKind::Hooked => (self.width * 3.0, self.length),
            ToolShapeKind::Isosceles => (self.length, self.length),
        }
    }

    pub fn dimensions(&self) -> Vector3d {
        let (across, along) = self.footprint();
        Vector3d::new(across, TOOL_HEIGHT, along)
    }
}

static TOOL_SHAPES: LazyLock<HashMap<String, ToolShape>> =
    LazyLock::new(build_tool_shapes);

fn build_tool_shapes() -> HashMap<String, ToolShape> {
    let mut shapes = HashMap::new();
    for &length in &TOOL_LENGTHS {
        for &width in &TOOL_WIDTHS {
            for kind in [ToolShapeKind::Rect, ToolShapeKind::Hooked] {
                let shape = ToolShape { kind, width, length };
                shapes.insert(shape.name(), shape);
            }
        }
        let shape = ToolShape {
            kind: ToolShapeKind::Isosceles,
            width: length,
            length,
        };
        shapes.insert(shape.name(), shape);
    }
    shapes
}

/// Look up a tool shape by its type name.
pub fn find_tool_shape(tool_type: &str) -> SceneResult<ToolShape> {
    TOOL_SHAPES
        .get(tool_type)
        .copied()
        .ok_or_else(|| {
            SceneError::config(
                "tool_type",
                format!("unknown tool shape {tool_type}"),
            )
        })
}

/// Resolve the shape name for a tool category of the given size.
pub fn get_tool_shape(
    length: f64,
    category: ToolCategory,
    width: f64,
) -> SceneResult<String> {
    let shape = match category {
        ToolCategory::Rect | ToolCategory::Inaccessible => ToolShape {
            kind: ToolShapeKind::Rect,
            width,
            length,
        },
        ToolCategory::Small | ToolCategory::Broken => ToolShape {
            kind: ToolShapeKind::Rect,
            width,
            length: SMALL_TOOL_LENGTH,
        },
        ToolCategory::Hooked => ToolShape {
            kind: ToolShapeKind::Hooked,
            width,
            length,
        },
        ToolCategory::Isosceles => ToolShape {
            kind: ToolShapeKind::Isosceles,
            width: length,
            length,
        },
    };
    let name = shape.name();
    if TOOL_SHAPES.contains_key(&name) {
        Ok(name)
    } else {
        Err(SceneError::config(
            "tool_shape",
            format!("no {category:?} tool of width {width}, length {length}"),
        ))
    }
}

// -- Single tools --------------------------------------------------

fn tool_bounds(
    shape: &ToolShape,
    x: f64,
    z: f64,
    rotation_y: f64,
) -> BoundingBox {
    create_bounds(
        &shape.dimensions(),
        &Vector3d::ZERO,
        &Vector3d::new(x, TOOL_HEIGHT / 2.0, z),
        rotation_y,
        TOOL_HEIGHT / 2.0,
    )
}

fn build_tool(
    id: String,
    shape: &ToolShape,
    x: f64,
    z: f64,
    rotation_y: f64,
    bounds: Option<BoundingBox>,
    material: &str,
) -> ObjectInstance {
    let (across, along) = shape.footprint();
    ObjectInstance {
        id,
        object_type: shape.name(),
        materials: vec![material.to_string()],
        kinematic: false,
        structure: false,
        mass: across * along,
        debug: DebugInfo {
            dimensions: shape.dimensions(),
            offset: Vector3d::ZERO,
            position_y: TOOL_HEIGHT / 2.0,
            info: color_labels(material, "tool"),
        },
        shows: vec![Show {
            step_begin: 0,
            position: Vector3d::new(x, TOOL_HEIGHT / 2.0, z),
            rotation: Vector3d::new(0.0, rotation_y, 0.0),
            scale: Vector3d::new(1.0, 1.0, 1.0),
            bounding_box: bounds
                .unwrap_or_else(|| tool_bounds(shape, x, z, rotation_y)),
        }],
        moves: vec![],
        rotates: vec![],
    }
}

/// Create a single tool. Precomputed `bounds` are used as given.
pub fn create_tool(
    params: &ToolParams,
    bounds: Option<BoundingBox>,
) -> SceneResult<ObjectInstance> {
    let shape = find_tool_shape(&params.tool_type)?;
    Ok(build_tool(
        params.id.clone(),
        &shape,
        params.position_x,
        params.position_z,
        params.rotation_y,
        bounds,
        &params.material,
    ))
}

/// Map (long, short) coordinates onto (x, z).
fn to_xz(long_axis: Axis, long: f64, short: f64) -> (f64, f64) {
    match long_axis {
        Axis::X => (long, short),
        Axis::Z => (short, long),
    }
}

// -- Broken tools --------------------------------------------------

/// Lay out a tool broken into `piece_count` pieces, starting at the
/// lava edge and stepping away from it, then twist the whole group
/// about the intact tool's centre.
pub fn create_broken_tool(
    rng: &mut Pcg32,
    params: &BrokenToolParams,
) -> SceneResult<Vec<ObjectInstance>> {
    if params.piece_count == 0 {
        return Err(SceneError::config(
            "piece_count",
            "a broken tool needs at least one piece",
        ));
    }
    let shape = find_tool_shape(&params.tool_type)?;
    let (_, piece_length) = shape.footprint();
    let long_axis = params.direction.axis();
    let step_sign = -params.direction.sign();
    let (pivot_x, pivot_z) = to_xz(
        long_axis,
        (params.max_length_pos + params.min_length_pos) / 2.0,
        params.width_position,
    );

    let mut pieces = Vec::with_capacity(params.piece_count as usize);
    for i in 0..params.piece_count {
        let pitch = piece_length + BROKEN_TOOL_VERTICAL_SEPARATION;
        let long = params.max_length_pos
            + step_sign * (piece_length / 2.0 + i as f64 * pitch);
        let jitter = BROKEN_TOOL_HORIZONTAL_JITTER;
        let short = params.width_position + rng.next_range(-jitter, jitter);
        let piece_rotation = rng.next_int(0, 359) as f64;
        let (x, z) = to_xz(long_axis, long, short);
        let group_rotation = params.rotation_for_entire_tool;
        let (x, z) =
            rotate_point_around_origin(pivot_x, pivot_z, x, z, group_rotation);
        let rotation_y = (piece_rotation + group_rotation).rem_euclid(360.0);
        pieces.push(build_tool(
            format!("{}_piece_{}", params.id, i),
            &shape,
            x,
            z,
            rotation_y,
            None,
            &params.material,
        ));
    }
    debug!(id = %params.id, pieces = pieces.len(), "broken tool");
    Ok(pieces)
}

// -- Inaccessible tools --------------------------------------------

/// Place a tool beside a blocking wall so that its near edge sits
/// exactly `blocking_wall_horizontal_offset` past the wall face. The
/// sign of the offset picks the side.
///
/// A rotated footprint's extent across the wall is not a linear
/// function of its centre, so the tool is positioned in two passes:
/// the first assumes an axis-aligned footprint and measures the miss,
/// the second shifts by exactly that miss.
pub fn create_inaccessible_tool(
    params: &InaccessibleToolParams,
) -> SceneResult<InaccessibleTool> {
    let offset = params.blocking_wall_horizontal_offset;
    if !(offset.abs() >= MIN_BLOCKING_WALL_SEPARATION) {
        return Err(SceneError::config(
            "blocking_wall_horizontal_offset",
            format!(
                "{offset} is closer than {MIN_BLOCKING_WALL_SEPARATION} \
                 to the wall"
            ),
        ));
    }
    let shape = find_tool_shape(&params.tool_type)?;
    let (tool_width, tool_length) = shape.footprint();
    let long_axis = params.long_direction.axis();
    let short_axis = long_axis.other();
    let long_sign = params.long_direction.sign();
    let side = offset.signum();
    let short_direction = Direction::from_axis(short_axis, side);

    // The wall lies along the long axis, from the lava edge back to the
    // room wall.
    let wall_cutoff_near = params.original_long_position;
    let wall_cutoff_far =
        -long_sign * long_axis.half_extent(&params.room_dimensions);
    let wall_length = (wall_cutoff_far - wall_cutoff_near).abs();
    let (wall_x, wall_z) = to_xz(
        long_axis,
        (wall_cutoff_near + wall_cutoff_far) / 2.0,
        params.original_short_position,
    );
    let wall_dims = match long_axis {
        Axis::X => Vector3d::new(
            wall_length,
            BLOCKING_WALL_HEIGHT,
            BLOCKING_WALL_THICKNESS,
        ),
        Axis::Z => Vector3d::new(
            BLOCKING_WALL_THICKNESS,
            BLOCKING_WALL_HEIGHT,
            wall_length,
        ),
    };
    let wall_position =
        Vector3d::new(wall_x, BLOCKING_WALL_HEIGHT / 2.0, wall_z);
    let blocking_wall = ObjectInstance {
        id: format!("{}_blocking_wall", params.id),
        object_type: "cube".into(),
        materials: vec![params.wall_material.clone()],
        kinematic: true,
        structure: true,
        mass: BLOCKING_WALL_MASS,
        debug: DebugInfo {
            dimensions: wall_dims,
            offset: Vector3d::ZERO,
            position_y: BLOCKING_WALL_HEIGHT / 2.0,
            info: color_labels(&params.wall_material, "wall"),
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
                BLOCKING_WALL_HEIGHT / 2.0,
            ),
        }],
        moves: vec![],
        rotates: vec![],
    };

    let wall_face = params.original_short_position
        + side * BLOCKING_WALL_THICKNESS / 2.0;
    let target_edge = wall_face + offset;
    let tool_long =
        params.original_long_position - long_sign * tool_length / 2.0;
    let near_edge = |bounds: &BoundingBox| {
        let (lo, hi) = extent_along(bounds, short_axis);
        if side > 0.0 {
            lo
        } else {
            hi
        }
    };

    // Pass 1.
    let guess = target_edge + side * tool_width / 2.0;
    let (x, z) = to_xz(long_axis, tool_long, guess);
    let first = tool_bounds(&shape, x, z, params.tool_rotation_y);
    // Pass 2.
    let short_position = guess + (target_edge - near_edge(&first));
    let (x, z) = to_xz(long_axis, tool_long, short_position);
    let tool = build_tool(
        params.id.clone(),
        &shape,
        x,
        z,
        params.tool_rotation_y,
        None,
        &params.tool_material,
    );
    debug!(
        id = %params.id,
        short_direction = ?short_direction,
        correction = short_position - guess,
        "inaccessible tool"
    );

    Ok(InaccessibleTool {
        tool,
        blocking_wall,
        short_direction,
        wall_cutoff_near,
        wall_cutoff_far,
    })
}
