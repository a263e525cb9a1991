//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic Rally objects. Field order
//! matches what the service returns with `fetch=true`.

use serde_json::{json, Value};

/// Base URL used inside fixture `_ref` links.
pub const FIXTURE_REF_BASE: &str = "https://rally1.rallydev.com/slm/webservice/1.39";

/// Workspace id every fixture belongs to.
pub const FIXTURE_WORKSPACE_ID: u64 = 41529001;

/// Project id every fixture belongs to.
pub const FIXTURE_PROJECT_ID: u64 = 41529087;

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Objects served by a default mock server.
pub struct DefaultScenario {
    pub iterations: Vec<Value>,
    pub releases: Vec<Value>,
}

impl Fixtures {
    /// A reference object pointing at `object_type` `id`.
    pub fn reference(object_type: &str, id: u64) -> Value {
        json!({
            "_rallyAPIMajor": "1",
            "_rallyAPIMinor": "39",
            "_ref": format!("{FIXTURE_REF_BASE}/{}/{id}.js", object_type.to_lowercase()),
            "_refObjectName": format!("{object_type} {id}"),
            "_type": object_type
        })
    }

    /// The workspace reference string to pass as a query workspace.
    pub fn workspace_ref() -> String {
        format!("{FIXTURE_REF_BASE}/workspace/{FIXTURE_WORKSPACE_ID}")
    }

    // =========================================================================
    // Iteration Fixtures
    // =========================================================================

    /// Create an iteration with the usual mix of field shapes.
    pub fn iteration(id: u64) -> Value {
        json!({
            "_ref": format!("{FIXTURE_REF_BASE}/iteration/{id}.js"),
            "_refObjectName": format!("Sprint {id}"),
            "_type": "Iteration",
            "ObjectID": id,
            "Name": format!("Sprint {id}"),
            "StartDate": "2012-05-14T06:00:00.000Z",
            "EndDate": "2012-05-25T05:59:59.000Z",
            "State": if id % 2 == 0 { "Accepted" } else { "Planning" },
            "PlannedVelocity": if id % 3 == 0 { Value::Null } else { json!(21.5) },
            "Notes": Value::Null,
            "Theme": "Stabilize the release train. ".repeat(12),
            "Workspace": Self::reference("Workspace", FIXTURE_WORKSPACE_ID),
            "Project": Self::reference("Project", FIXTURE_PROJECT_ID),
            "RevisionHistory": Self::reference("RevisionHistory", id + 500_000),
            "UserIterationCapacities": [
                Self::reference("UserIterationCapacity", id * 10 + 1),
                Self::reference("UserIterationCapacity", id * 10 + 2)
            ],
            "Summary": {
                "Defects": {"Count": 4, "State+Open": 1}
            }
        })
    }

    /// Create `count` iterations with ids starting at 1.
    pub fn iterations(count: u64) -> Vec<Value> {
        (1..=count).map(Self::iteration).collect()
    }

    // =========================================================================
    // Release Fixtures
    // =========================================================================

    /// Create a release.
    pub fn release(id: u64) -> Value {
        json!({
            "_ref": format!("{FIXTURE_REF_BASE}/release/{id}.js"),
            "_refObjectName": format!("R{id}"),
            "_type": "Release",
            "ObjectID": id,
            "Name": format!("R{id}"),
            "ReleaseDate": "2012-09-28T05:59:59.000Z",
            "ReleaseStartDate": "2012-07-02T06:00:00.000Z",
            "State": "Active",
            "Accepted": 0,
            "GrossEstimateConversionRatio": 1.0,
            "Notes": Value::Null,
            "Project": Self::reference("Project", FIXTURE_PROJECT_ID),
            "Workspace": Self::reference("Workspace", FIXTURE_WORKSPACE_ID)
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// 120 iterations and 3 releases.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            iterations: Self::iterations(120),
            releases: (1..=3).map(Self::release).collect(),
        }
    }
}
