//! Batch driver: run a list of geometry requests against one room.
//!
//! One PRNG seeded from `PlanParams::seed` is shared by every request,
//! so a plan is reproducible as a whole. Each accepted object's
//! bounding box is fed into later object placements.

use tracing::{debug, info};

use crate::error::SceneResult;
use crate::occluders::{create_occluder, generate_occluder_position};
use crate::placement::place_object;
use crate::prng::Pcg32;
use crate::tools::{
    create_broken_tool, create_inaccessible_tool, create_tool,
};
use crate::types::{
    BoundingBox, ObjectInstance, Occluder, PlanParams, PlanRequest,
    PlanResult, ToolLayout,
};

#[derive(Default)]
struct PlanState {
    objects: Vec<ObjectInstance>,
    bounds: Vec<BoundingBox>,
    occluders: Vec<Occluder>,
    tool_layouts: Vec<ToolLayout>,
}

impl PlanState {
    fn accept(&mut self, object: ObjectInstance) {
        self.bounds.push(object.bounding_box().clone());
        self.objects.push(object);
    }
}

fn run_request(
    rng: &mut Pcg32,
    params: &PlanParams,
    request: &PlanRequest,
    state: &mut PlanState,
) -> SceneResult<()> {
    match request {
        PlanRequest::Occluder {
            random_position,
            occluder,
        } => {
            let mut occluder = occluder.clone();
            if *random_position {
                occluder.x_position = generate_occluder_position(
                    rng,
                    occluder.occluder_width,
                    &state.occluders,
                    occluder.room_dimensions.x / 2.0,
                )?;
            }
            let built = create_occluder(&occluder)?;
            state.accept(built.wall.clone());
            state.accept(built.pole.clone());
            state.occluders.push(built);
        }
        PlanRequest::Tool(tool) => {
            state.accept(create_tool(tool, None)?);
        }
        PlanRequest::BrokenTool(broken) => {
            for piece in create_broken_tool(rng, broken)? {
                state.accept(piece);
            }
        }
        PlanRequest::InaccessibleTool(inaccessible) => {
            let built = create_inaccessible_tool(inaccessible)?;
            state.tool_layouts.push(ToolLayout {
                tool_id: built.tool.id.clone(),
                short_direction: built.short_direction,
                wall_cutoff_near: built.wall_cutoff_near,
                wall_cutoff_far: built.wall_cutoff_far,
            });
            state.accept(built.tool);
            state.accept(built.blocking_wall);
        }
        PlanRequest::Object(object) => {
            let placed = place_object(
                rng,
                object,
                &params.room_dimensions,
                &params.performer_start,
                &state.bounds,
            )?;
            state.accept(placed);
        }
    }
    Ok(())
}

/// Run every request in order. The first failing request aborts the
/// plan.
pub fn plan(params: &PlanParams) -> SceneResult<PlanResult> {
    info!(
        seed = params.seed,
        requests = params.requests.len(),
        "plan start"
    );
    let mut rng = Pcg32::new(params.seed, 0);
    let mut state = PlanState::default();
    for (index, request) in params.requests.iter().enumerate() {
        run_request(&mut rng, params, request, &mut state)?;
        debug!(index, objects = state.objects.len(), "request done");
    }
    info!(objects = state.objects.len(), "plan done");
    Ok(PlanResult {
        objects: state.objects,
        tool_layouts: state.tool_layouts,
    })
}
