use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Recommender, SearchError};
use crate::models::{ErrorResponse, HealthResponse, LodgingRequest, RoutesResponse, SearchRequest};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub lodging_count: usize,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search))
        .route("/lodging", web::get().to(lodging))
        .route("/routes", web::get().to(known_routes));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let flights_loaded = state.recommender.catalog().flights().len();
    let status = if flights_loaded > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        flights_loaded,
    })
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "origin": "DXB",
///   "destination": "LHR",
///   "user_id": "string | guest",
///   "semantic_query": "direct flights under $400",
///   "include_lodging": false
/// }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        "[{}] Search {} -> {} (user: {:?}, query: {:?})",
        request_id,
        req.origin,
        req.destination,
        req.effective_user_id(),
        req.effective_query()
    );

    let outcome = state
        .recommender
        .search(&req.origin, &req.destination, req.effective_user_id(), req.effective_query())
        .await;

    match outcome {
        Ok(mut results) => {
            if req.include_lodging {
                let lodging = state.recommender.recommend_lodging(&req.destination, state.lodging_count);
                tracing::debug!("[{}] Found {} lodging offers for {}", request_id, lodging.len(), req.destination);
                results.lodging = Some(lodging);
            }
            HttpResponse::Ok().json(results)
        }
        Err(e) => {
            let error = match &e {
                SearchError::NoOffersForRoute { .. } => "no_offers_for_route",
                SearchError::NoSmartSearchMatch { .. } => "no_smart_search_match",
            };
            HttpResponse::NotFound().json(ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: 404,
            })
        }
    }
}

/// Lodging endpoint
///
/// GET /api/v1/lodging?city={city}&k={k}
async fn lodging(
    state: web::Data<AppState>,
    query: web::Query<LodgingRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let k = query.k.unwrap_or(state.lodging_count);
    HttpResponse::Ok().json(state.recommender.recommend_lodging(&query.city, k))
}

/// Known origins and destinations
///
/// GET /api/v1/routes
async fn known_routes(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.recommender.catalog();
    HttpResponse::Ok().json(RoutesResponse {
        origins: catalog.origins(),
        destinations: catalog.destinations(),
    })
}
