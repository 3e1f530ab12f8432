use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Matcher, MatchingError};
use crate::models::{ErrorResponse, HealthResponse, RunMatchingRequest, RunMatchingResponse};
use crate::services::MatchingEngine;
use std::sync::Arc;

/// Matcher with the engine chosen at startup
pub type SharedMatcher = Matcher<Arc<dyn MatchingEngine>>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<SharedMatcher>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching", web::post().to(run_matching));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching endpoint
///
/// POST /api/v1/matching
///
/// Request body:
/// ```json
/// {
///   "helpers": [Helper],
///   "helpees": [Helpee],
///   "settings": { "balancingCoefficients": { ... } }
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for matching request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let run_id = uuid::Uuid::new_v4();
    let request = req.into_inner();
    let matcher = state.matcher.clone();

    tracing::info!(
        "Matching run {}: {} helpers, {} helpees",
        run_id,
        request.helpers.len(),
        request.helpees.len()
    );

    // The pipeline blocks on the engine process, so keep it off the async workers
    let outcome = web::block(move || {
        let settings = request.settings.unwrap_or(*matcher.default_settings());
        matcher.match_persons(&request.helpers, &request.helpees, &settings)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            tracing::info!("Matching run {} returned {} matches", run_id, result.matches.len());
            HttpResponse::Ok().json(RunMatchingResponse {
                matches: result.matches,
                stats: result.stats,
            })
        }
        Ok(Err(e)) => {
            tracing::error!("Matching run {} failed: {}", run_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: error_kind(&e).to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
        Err(e) => {
            tracing::error!("Matching run {} could not be scheduled: {}", run_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching unavailable".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

fn error_kind(err: &MatchingError) -> &'static str {
    match err {
        MatchingError::Serialization(_) => "Failed to encode matching input",
        MatchingError::Artifact(_) => "Artifact storage failed",
        MatchingError::Engine(_) => "Matching engine failed",
        MatchingError::Decode(_) => "Invalid matching engine output",
    }
}
