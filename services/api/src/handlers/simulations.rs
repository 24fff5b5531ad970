use axum::{
    extract::{Query, State},
    Json,
};
use std::time::Instant;

use crate::{
    domain::{DefaultsResponse, LatestQuery, RunSimulationRequest, SimulationView},
    errors::{AppError, Result},
    extractors::JsonOrDefault,
    session::RunMetadata,
    state::AppState,
};

/// Run a new simulation and make it the session's latest run
#[tracing::instrument(name = "run_simulation", skip_all)]
pub async fn run_simulation(
    State(state): State<AppState>,
    JsonOrDefault(req): JsonOrDefault<RunSimulationRequest>,
) -> Result<Json<SimulationView>> {
    let params = req.resolve(&state.config.simulation)?;
    let seed = req.seed.or(state.config.simulation.seed);
    let metadata = RunMetadata::new(seed, req.bins.or(state.config.simulation.histogram_bins));

    tracing::debug!(
        run_id = %metadata.run_id,
        flip_count = params.flip_count(),
        trial_count = params.trial_count(),
        head_probability = params.head_probability(),
        alpha = params.alpha(),
        seeded = seed.is_some(),
        "Running simulation"
    );

    let started = Instant::now();
    let (result, view) = tokio::task::spawn_blocking({
        let metadata = metadata.clone();
        move || {
            let mut rng = simulator::rng_from_seed(seed);
            let result = simulator::generate_for(&mut rng, &params)?;
            let view = SimulationView::build(&metadata, &params, &result, None)?;
            Ok::<_, simulator::SimulationError>((result, view))
        }
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Simulation task failed: {}", e)))??;
    let elapsed = started.elapsed();

    // The report is built before storing, so the session never holds a run
    // whose report cannot be derived.
    state.session.write().await.record(params, result, metadata);

    tracing::info!(
        run_id = %view.run_id,
        mean_proportion = view.report.mean_proportion,
        average_p_value = view.report.average_p_value,
        verdict = %view.report.verdict,
        elapsed_ms = elapsed.as_millis() as u64,
        "Simulation completed"
    );

    metrics::counter!("simulations_run_total").increment(1);
    metrics::counter!("simulation_verdicts_total", "verdict" => view.report.verdict.as_str())
        .increment(1);
    metrics::histogram!("simulation_duration_seconds").record(elapsed.as_secs_f64());

    Ok(Json(view))
}

/// Re-derive the view of the session's latest run
#[tracing::instrument(name = "latest_simulation", skip_all)]
pub async fn latest_simulation(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<SimulationView>> {
    let (params, result, metadata) = {
        let session = state.session.read().await;
        let latest = session.latest().ok_or_else(|| {
            tracing::debug!("No stored simulation");
            AppError::SimulationNotFound
        })?;
        (*latest.params, latest.result.clone(), latest.metadata.clone())
    };

    let view = tokio::task::spawn_blocking(move || {
        SimulationView::build(&metadata, &params, &result, query.bins)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Summary task failed: {}", e)))??;

    tracing::debug!(run_id = %view.run_id, "Latest simulation retrieved");
    Ok(Json(view))
}

pub async fn simulation_defaults(State(state): State<AppState>) -> Json<DefaultsResponse> {
    Json(DefaultsResponse::from(&state.config.simulation))
}
