//! Data types for the scene geometry JSON schema.
//!
//! Output records use the camelCase field names the scene assembler
//! expects (`stepBegin`, `boundingBox`, ...). Parameter structs carry
//! their documented defaults so callers only send what they resolve.

use serde::{Deserialize, Serialize};

// -- Geometry ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector3d {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vector3d {
    pub const ZERO: Vector3d = Vector3d { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3d { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub z: f64,
}

impl Point2D {
    pub const fn new(x: f64, z: f64) -> Self {
        Point2D { x, z }
    }
}

/// Horizontal axis of the room floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    pub fn of(self, point: &Point2D) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Z => point.z,
        }
    }

    pub fn half_extent(self, room: &Vector3d) -> f64 {
        match self {
            Axis::X => room.x / 2.0,
            Axis::Z => room.z / 2.0,
        }
    }
}

/// Room-relative direction. Left/right run along X, front/back along Z;
/// the performer faces +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Front,
    Back,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Front | Direction::Back => Axis::Z,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Right | Direction::Front => 1.0,
            Direction::Left | Direction::Back => -1.0,
        }
    }

    pub fn from_axis(axis: Axis, sign: f64) -> Direction {
        match (axis, sign < 0.0) {
            (Axis::X, true) => Direction::Left,
            (Axis::X, false) => Direction::Right,
            (Axis::Z, true) => Direction::Back,
            (Axis::Z, false) => Direction::Front,
        }
    }
}

/// Oriented footprint plus vertical extent of a posed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub box_xz: [Point2D; 4],
    pub max_y: f64,
    pub min_y: f64,
}

// -- Instances -----------------------------------------------------

fn is_false(v: &bool) -> bool {
    !v
}

/// One timed segment of a `moves` or `rotates` schedule. The vector is
/// applied once per step from `stepBegin` to `stepEnd` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeSegment {
    pub step_begin: u32,
    pub step_end: u32,
    pub vector: Vector3d,
    #[serde(default, skip_serializing_if = "is_false")]
    pub repeat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_wait: Option<u32>,
}

impl KeyframeSegment {
    pub fn new(step_begin: u32, step_end: u32, vector: Vector3d) -> Self {
        KeyframeSegment {
            step_begin,
            step_end,
            vector,
            repeat: false,
            step_wait: None,
        }
    }

    /// Number of steps the segment is active, inclusive of both ends.
    pub fn length(&self) -> u32 {
        self.step_end - self.step_begin + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub step_begin: u32,
    pub position: Vector3d,
    pub rotation: Vector3d,
    pub scale: Vector3d,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub dimensions: Vector3d,
    #[serde(default)]
    pub offset: Vector3d,
    #[serde(default)]
    pub position_y: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub info: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub kinematic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub structure: bool,
    pub mass: f64,
    pub debug: DebugInfo,
    pub shows: Vec<Show>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<KeyframeSegment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotates: Vec<KeyframeSegment>,
}

impl ObjectInstance {
    /// Pose at step 0. Every constructor in this crate emits exactly one
    /// show entry.
    pub fn initial(&self) -> &Show {
        &self.shows[0]
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.initial().bounding_box
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occluder {
    pub wall: ObjectInstance,
    pub pole: ObjectInstance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InaccessibleTool {
    pub tool: ObjectInstance,
    pub blocking_wall: ObjectInstance,
    pub short_direction: Direction,
    pub wall_cutoff_near: f64,
    pub wall_cutoff_far: f64,
}

// -- Parameters ----------------------------------------------------

pub fn default_room_dimensions() -> Vector3d {
    Vector3d::new(10.0, 3.0, 10.0)
}

fn default_occluder_id() -> String {
    "occluder".into()
}

fn default_occluder_height() -> f64 {
    1.8
}

fn default_occluder_thickness() -> f64 {
    0.1
}

fn default_occluder_z_position() -> f64 {
    1.0
}

/// Which room wall a sideways occluder's pole is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidewaysMode {
    Left,
    Right,
    Front,
    Back,
}

impl SidewaysMode {
    pub fn direction(self) -> Direction {
        match self {
            SidewaysMode::Left => Direction::Left,
            SidewaysMode::Right => Direction::Right,
            SidewaysMode::Front => Direction::Front,
            SidewaysMode::Back => Direction::Back,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccluderParams {
    #[serde(default = "default_occluder_id")]
    pub id: String,
    pub wall_material: String,
    pub pole_material: String,
    #[serde(default)]
    pub x_position: f64,
    pub occluder_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_step: Option<u32>,
    #[serde(default = "default_occluder_height")]
    pub occluder_height: f64,
    #[serde(default = "default_occluder_thickness")]
    pub occluder_thickness: f64,
    #[serde(default = "default_occluder_z_position")]
    pub z_position: f64,
    #[serde(default = "default_room_dimensions")]
    pub room_dimensions: Vector3d,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sideways: Option<SidewaysMode>,
    #[serde(default)]
    pub reverse_direction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_movement: Option<u32>,
}

impl OccluderParams {
    pub fn new(
        wall_material: &str,
        pole_material: &str,
        x_position: f64,
        occluder_width: f64,
    ) -> Self {
        OccluderParams {
            id: default_occluder_id(),
            wall_material: wall_material.into(),
            pole_material: pole_material.into(),
            x_position,
            occluder_width,
            last_step: None,
            occluder_height: default_occluder_height(),
            occluder_thickness: default_occluder_thickness(),
            z_position: default_occluder_z_position(),
            room_dimensions: default_room_dimensions(),
            sideways: None,
            reverse_direction: false,
            repeat_movement: None,
        }
    }
}

fn default_tool_id() -> String {
    "tool".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParams {
    #[serde(default = "default_tool_id")]
    pub id: String,
    pub tool_type: String,
    pub position_x: f64,
    pub position_z: f64,
    #[serde(default)]
    pub rotation_y: f64,
    pub material: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenToolParams {
    #[serde(default = "default_tool_id")]
    pub id: String,
    /// Shape of every piece.
    pub tool_type: String,
    /// Direction from the tool toward the lava; picks the long axis.
    pub direction: Direction,
    /// Coordinate along the short axis the pieces are centred on.
    pub width_position: f64,
    /// Long-axis coordinate of the lava edge, where the first piece starts.
    pub max_length_pos: f64,
    /// Long-axis coordinate of the far end of the intact tool.
    pub min_length_pos: f64,
    #[serde(default)]
    pub rotation_for_entire_tool: f64,
    pub piece_count: u32,
    pub material: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InaccessibleToolParams {
    #[serde(default = "default_tool_id")]
    pub id: String,
    pub tool_type: String,
    /// Direction from the tool toward the lava.
    pub long_direction: Direction,
    /// Short-axis coordinate aligned with the target.
    pub original_short_position: f64,
    /// Long-axis coordinate of the lava edge.
    pub original_long_position: f64,
    /// Signed clearance between the wall face and the tool's near edge.
    pub blocking_wall_horizontal_offset: f64,
    #[serde(default)]
    pub tool_rotation_y: f64,
    pub tool_material: String,
    pub wall_material: String,
    #[serde(default = "default_room_dimensions")]
    pub room_dimensions: Vector3d,
}

/// Read-only template for a generic interactable object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub object_type: String,
    pub dimensions: Vector3d,
    #[serde(default)]
    pub offset: Vector3d,
    /// Height of the object's centre above the floor when resting.
    /// Defaults to half the height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Fixed objects are placed kinematic.
    #[serde(default = "default_moveable")]
    pub moveable: bool,
}

fn default_mass() -> f64 {
    1.0
}

fn default_moveable() -> bool {
    true
}

impl ObjectDefinition {
    pub fn standing_y(&self) -> f64 {
        self.position_y.unwrap_or(self.dimensions.y / 2.0)
    }
}

fn default_object_id() -> String {
    "object".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPlacementParams {
    #[serde(default = "default_object_id")]
    pub id: String,
    pub definition: ObjectDefinition,
    #[serde(default)]
    pub material: Option<String>,
    /// Positions to draw from instead of sampling the whole room.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Point2D>,
}

// -- Plan I/O ------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum PlanRequest {
    Occluder {
        /// Draw the X position instead of using `occluder.x_position`.
        #[serde(default)]
        random_position: bool,
        occluder: OccluderParams,
    },
    Tool(ToolParams),
    BrokenTool(BrokenToolParams),
    InaccessibleTool(InaccessibleToolParams),
    Object(ObjectPlacementParams),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanParams {
    pub seed: u64,
    #[serde(default = "default_room_dimensions")]
    pub room_dimensions: Vector3d,
    #[serde(default)]
    pub performer_start: Point2D,
    #[serde(default)]
    pub requests: Vec<PlanRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolLayout {
    pub tool_id: String,
    pub short_direction: Direction,
    pub wall_cutoff_near: f64,
    pub wall_cutoff_far: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub objects: Vec<ObjectInstance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_layouts: Vec<ToolLayout>,
}

// -- Tests ---------------------------------------------------------
