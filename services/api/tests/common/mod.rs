/// Common test utilities and fixtures for integration tests
use axum_test::TestServer;
use serde_json::Value;
use simulation_api::{
    build_router,
    config::{Config, SimulationConfig},
    state::AppState,
};

/// Test fixtures and helper functions
pub struct TestContext {
    pub server: TestServer,
    pub state: AppState,
}

impl TestContext {
    /// Create an in-process server with small default workloads
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config);
        let server =
            TestServer::new(build_router(state.clone())).expect("Failed to start test server");

        Self { server, state }
    }
}

/// Defaults shrunk so tests stay fast; limits kept small to exercise them
pub fn test_config() -> Config {
    Config {
        simulation: SimulationConfig {
            default_trial_count: 200,
            default_flip_count: 100,
            max_trial_count: 10_000,
            max_flip_count: 100_000,
            ..SimulationConfig::default()
        },
        ..Config::default()
    }
}

/// Helper function to parse error response
pub fn parse_error(body: &Value) -> Option<(String, String, String)> {
    let error = body.get("error")?;

    Some((
        error.get("code")?.as_str()?.to_string(),
        error.get("message")?.as_str()?.to_string(),
        error.get("category")?.as_str()?.to_string(),
    ))
}
