//! Scene geometry engine for physical-reasoning scene generation.
//!
//! Builds posed objects with oriented bounding boxes, synthesizes the
//! move/rotate schedules of occluders, and lays out single, broken and
//! inaccessible tools. `plan_json` accepts a JSON string (plan params)
//! and returns a JSON string (plan result).

pub mod collision;
pub mod error;
pub mod materials;
pub mod math;
pub mod occluders;
pub mod placement;
pub mod plan;
pub mod prng;
pub mod tools;
pub mod types;

pub use error::{SceneError, SceneResult};

/// Run a batch of geometry requests.
///
/// Takes a JSON string matching `types::PlanParams` and returns a JSON
/// string matching `types::PlanResult`.
pub fn plan_json(params_json: &str) -> SceneResult<String> {
    let params: types::PlanParams = serde_json::from_str(params_json)?;
    let result = plan::plan(&params)?;
    Ok(serde_json::to_string(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_json_round_trip() {
        let json = r#"{
            "seed": 12,
            "performer_start": {"x": 0.0, "z": -4.5},
            "requests": [
                {"operation": "occluder",
                 "occluder": {"wall_material": "Custom/Materials/Grey",
                              "pole_material": "Custom/Materials/Black",
                              "x_position": -1.5, "occluder_width": 1.0,
                              "last_step": 160}},
                {"operation": "tool", "id": "tool_1",
                 "tool_type": "tool_hooked_0_50_x_4_00",
                 "position_x": 2.0, "position_z": -1.0, "rotation_y": 90,
                 "material": "Custom/Materials/Azure"}
            ]
        }"#;
        let out = plan_json(json).expect("valid plan");
        let value: serde_json::Value =
            serde_json::from_str(&out).expect("json out");
        let objects = value["objects"].as_array().expect("objects");
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0]["id"], "occluder_wall");
        assert_eq!(objects[2]["type"], "tool_hooked_0_50_x_4_00");
        assert_eq!(objects[0]["moves"][0]["stepBegin"], 1);
        assert!(value.get("tool_layouts").is_none());
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            plan_json("{\"seed\": "),
            Err(SceneError::Json(_))
        ));
        let unknown = r#"{"seed": 1,
            "requests": [{"operation": "teleport"}]}"#;
        assert!(matches!(plan_json(unknown), Err(SceneError::Json(_))));
    }

    fn occluder_plan(schedule: &str) -> String {
        format!(
            r#"{{"seed": 3, "requests": [{{"operation": "occluder",
                "occluder": {{"wall_material": "a", "pole_material": "b",
                              "occluder_width": 1.0, {schedule}}}}}]}}"#
        )
    }

    #[test]
    fn occluder_schedule_out_of_range() {
        let early = plan_json(&occluder_plan(r#""last_step": 3"#));
        assert!(matches!(
            early,
            Err(SceneError::Config { parameter: "last_step", .. })
        ));
        let huge =
            plan_json(&occluder_plan(r#""repeat_movement": 4294967295"#));
        assert!(matches!(
            huge,
            Err(SceneError::Config { parameter: "repeat_movement", .. })
        ));
    }
}
