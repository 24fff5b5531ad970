/// Integration tests for the simulation endpoints
mod common;

use axum::http::StatusCode;
use common::{parse_error, TestContext};
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_reports_empty_session() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["session"]["has_run"], json!(false));
}

#[tokio::test]
async fn test_latest_before_any_run_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/simulations/latest").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    let (code, message, category) = parse_error(&body).expect("Failed to parse error");
    assert_eq!(code, "NOT_FOUND_SIMULATION");
    assert_eq!(category, "NotFound");
    assert!(message.contains("run a simulation"));
}

#[tokio::test]
async fn test_run_with_defaults() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/simulations").json(&json!({})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["parameters"]["trial_count"], json!(200));
    assert_eq!(body["parameters"]["flip_count"], json!(100));
    assert_eq!(body["parameters"]["head_probability"], json!(0.5));
    assert_eq!(body["parameters"]["alpha"], json!(0.05));
    assert_eq!(body["proportions"].as_array().unwrap().len(), 200);
    assert!(body.get("seed").is_none());

    let report = &body["report"];
    let mean = report["mean_proportion"].as_f64().unwrap();
    assert!((mean - 0.5).abs() < 0.02);
    assert_eq!(report["alpha"], json!(0.05));
    assert!(report["verdict"] == json!("fair") || report["verdict"] == json!("unfair"));

    let histogram = &body["histogram"];
    assert_eq!(histogram["total"], json!(200));
    let area: f64 = histogram["bins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|bin| {
            bin["density"].as_f64().unwrap()
                * (bin["upper"].as_f64().unwrap() - bin["lower"].as_f64().unwrap())
        })
        .sum();
    assert!((area - 1.0).abs() < 1e-9);
    assert_eq!(histogram["kde"]["points"].as_array().unwrap().len(), 200);
    assert!(histogram["kde"]["bandwidth"].as_f64().unwrap() > 0.0);
    assert_eq!(body["x_label"], json!("Expected Value of Heads"));
    assert_eq!(body["y_label"], json!("Density"));

    assert_eq!(
        body["title"],
        json!("Distribution of Expected Value of Heads\n100 Flips, 200 Trials")
    );
    let summary = body["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[0], json!("Significance Level (Alpha): 0.05"));

    assert!(ctx.state.session.read().await.has_run());
}

#[tokio::test]
async fn test_all_heads_run_is_unfair() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/simulations")
        .json(&json!({
            "head_probability": 1.0,
            "trial_count": 5,
            "flip_count": 10
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["proportions"], json!([1.0, 1.0, 1.0, 1.0, 1.0]));
    assert_eq!(body["report"]["verdict"], json!("unfair"));
    let p = body["report"]["average_p_value"].as_f64().unwrap();
    assert!((p - 0.001_953_125).abs() < 1e-9);
    assert_eq!(body["summary"][1], json!("Average P-Value from Simulation: 0.0020"));
    assert_eq!(body["summary"][2], json!("Conclusion: The coin is unfair."));
    assert_eq!(body["mean_label"], json!("Mean: 1.0000"));
    // Identical proportions: one bin, no curve
    assert_eq!(body["histogram"]["bins"].as_array().unwrap().len(), 1);
    assert!(body["histogram"]["kde"].is_null());
}

#[tokio::test]
async fn test_run_without_body_uses_defaults() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/simulations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["parameters"]["trial_count"], json!(200));
    assert_eq!(body["parameters"]["flip_count"], json!(100));
    assert_eq!(body["proportions"].as_array().unwrap().len(), 200);
    assert!(ctx.state.session.read().await.has_run());
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    let ctx = TestContext::new();
    let request = json!({ "seed": 42, "trial_count": 300, "flip_count": 50 });

    let first: Value = ctx.server.post("/api/simulations").json(&request).await.json();
    let second: Value = ctx.server.post("/api/simulations").json(&request).await.json();

    assert_eq!(first["seed"], json!(42));
    assert_eq!(first["report"], second["report"]);
    assert_eq!(first["histogram"], second["histogram"]);
    assert_ne!(first["run_id"], second["run_id"]);
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected() {
    let ctx = TestContext::new();

    for (request, parameter) in [
        (json!({ "trial_count": 0 }), "trial_count"),
        (json!({ "flip_count": 0 }), "flip_count"),
        (json!({ "alpha": 1.5 }), "alpha"),
        (json!({ "head_probability": -0.2 }), "head_probability"),
        (json!({ "trial_count": 10_001 }), "trial_count"),
        (json!({ "bins": 0 }), "bins"),
    ] {
        let response = ctx.server.post("/api/simulations").json(&request).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", request);

        let body: Value = response.json();
        let (code, message, category) = parse_error(&body).expect("Failed to parse error");
        assert_eq!(code, "VALIDATION_INVALID_PARAMETER");
        assert_eq!(category, "Validation");
        assert!(message.contains(parameter), "{} should mention {}", message, parameter);
    }

    assert!(!ctx.state.session.read().await.has_run());
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/simulations")
        .json(&json!({ "n_flips": 10 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let (code, _, category) = parse_error(&response.json()).expect("Failed to parse error");
    assert_eq!(code, "VALIDATION_INVALID_INPUT");
    assert_eq!(category, "Validation");

    let response = ctx
        .server
        .post("/api/simulations")
        .json(&json!({ "trial_count": -5 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let (code, message, _) = parse_error(&response.json()).expect("Failed to parse error");
    assert_eq!(code, "VALIDATION_INVALID_INPUT");
    assert!(message.contains("trial_count"));
}

#[tokio::test]
async fn test_rejected_run_keeps_previous_result() {
    let ctx = TestContext::new();

    let accepted: Value = ctx
        .server
        .post("/api/simulations")
        .json(&json!({ "alpha": 0.01, "seed": 7 }))
        .await
        .json();

    let rejected = ctx
        .server
        .post("/api/simulations")
        .json(&json!({ "alpha": 0.0 }))
        .await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);

    let latest: Value = ctx.server.get("/api/simulations/latest").await.json();
    assert_eq!(latest["run_id"], accepted["run_id"]);
    assert_eq!(latest["report"]["alpha"], json!(0.01));
}

#[tokio::test]
async fn test_latest_rederives_the_stored_report() {
    let ctx = TestContext::new();

    let run: Value = ctx
        .server
        .post("/api/simulations")
        .json(&json!({ "alpha": 0.2, "head_probability": 0.45, "seed": 3 }))
        .await
        .json();

    let response = ctx
        .server
        .get("/api/simulations/latest")
        .add_query_param("bins", 5)
        .await;
    response.assert_status_ok();

    let latest: Value = response.json();
    assert_eq!(latest["run_id"], run["run_id"]);
    assert_eq!(latest["parameters"], run["parameters"]);
    assert_eq!(latest["report"], run["report"]);
    assert_eq!(latest["summary"], run["summary"]);
    assert_eq!(latest["histogram"]["bins"].as_array().unwrap().len(), 5);
    assert_eq!(latest["histogram"]["kde"], run["histogram"]["kde"]);
    assert_eq!(latest["proportions"], run["proportions"]);
}

#[tokio::test]
async fn test_defaults_endpoint() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/simulations/defaults").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["head_probability"], json!(0.5));
    assert_eq!(body["trial_count"], json!(200));
    assert_eq!(body["flip_count"], json!(100));
    assert_eq!(body["alpha"], json!(0.05));
    assert_eq!(body["max_trial_count"], json!(10_000));
}
