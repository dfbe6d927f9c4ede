use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{count_active_members, ActiveMemberCounts, MatchError, Matcher};
use crate::models::{
    ActiveMembersResponse, BlockRequest, BlockResponse, ErrorResponse, GetMatchesRequest,
    HealthResponse, MatchesResponse,
};
use crate::services::{CacheKey, CacheManager, MatchStore, StoreError};

/// Application state shared across all handlers
pub struct AppState<S> {
    pub store: Arc<S>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            matcher: self.matcher.clone(),
            matching: self.matching.clone(),
        }
    }
}

/// Configure all match-related routes
pub fn configure<S: MatchStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check::<S>))
        .route("/matches", web::get().to(get_matches::<S>))
        .route("/blocks", web::post().to(block_user::<S>))
        .route("/blocks", web::delete().to(unblock_user::<S>))
        .route("/members/active", web::get().to(active_members::<S>));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check<S: MatchStore>(state: web::Data<AppState<S>>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Ranked matches endpoint
///
/// GET /api/v1/matches?userId={uuid}&page={n}&pageSize={n}
///
/// Returns the requested 1-based page, best match first. A fatal error
/// never yields a partial list.
async fn get_matches<S: MatchStore>(
    state: web::Data<AppState<S>>,
    query: web::Query<GetMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for matches request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let user_id = query.user_id;
    let page_size = state.matching.page_size(query.page_size);
    let today = Utc::now().date_naive();

    tracing::info!("Ranking matches for user: {}, page: {}, page size: {}", user_id, query.page, page_size);

    let result = state
        .matcher
        .get_matches(state.store.as_ref(), user_id, page_size, query.page, today)
        .await;

    match result {
        Ok(page) => {
            tracing::info!(
                "Returning {} matches for user {} (page {} of {} results)",
                page.matches.len(),
                user_id,
                page.page,
                page.total_results
            );

            HttpResponse::Ok().json(MatchesResponse {
                user_id,
                matches: page.matches,
                page: page.page,
                page_size: page.page_size,
                total_results: page.total_results,
                has_next: page.has_next,
            })
        }
        Err(MatchError::UserNotFound(id)) => error_response(
            StatusCode::NOT_FOUND,
            "User not found",
            format!("No user with id {}", id),
        ),
        Err(e) => {
            tracing::error!("Failed to rank matches for {}: {}", user_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to compute matches",
                "Matches are temporarily unavailable".to_string(),
            )
        }
    }
}

fn store_error_response(action: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::InvalidInput(message) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid block", message)
        }
        e => {
            tracing::error!("Failed to {}: {}", action, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to {}", action),
                "The request could not be completed".to_string(),
            )
        }
    }
}

/// Block endpoint
///
/// POST /api/v1/blocks
///
/// Request body:
/// ```json
/// {
///   "blockerId": "uuid",
///   "blockedId": "uuid"
/// }
/// ```
async fn block_user<S: MatchStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<BlockRequest>,
) -> impl Responder {
    match state.store.block(req.blocker_id, req.blocked_id).await {
        Ok(changed) => {
            tracing::info!("User {} blocked {}", req.blocker_id, req.blocked_id);
            HttpResponse::Ok().json(BlockResponse { success: true, changed })
        }
        Err(e) => store_error_response("record block", e),
    }
}

/// Unblock endpoint
///
/// DELETE /api/v1/blocks with the same body as the block endpoint
async fn unblock_user<S: MatchStore>(
    state: web::Data<AppState<S>>,
    req: web::Json<BlockRequest>,
) -> impl Responder {
    match state.store.unblock(req.blocker_id, req.blocked_id).await {
        Ok(changed) => {
            tracing::info!("User {} unblocked {}", req.blocker_id, req.blocked_id);
            HttpResponse::Ok().json(BlockResponse { success: true, changed })
        }
        Err(e) => store_error_response("remove block", e),
    }
}

/// Active member counts endpoint
///
/// GET /api/v1/members/active
///
/// Counts are cached; a cache failure only costs a recount.
async fn active_members<S: MatchStore>(state: web::Data<AppState<S>>) -> impl Responder {
    let rules = state.matcher.rules();
    let cache_key = CacheKey::active_members(rules.min_height_to_match, rules.max_height_to_match);

    let counts = match state.cache.get::<ActiveMemberCounts>(&cache_key).await {
        Ok(counts) => counts,
        Err(_) => match count_active_members(state.store.as_ref(), rules, Utc::now()).await {
            Ok(counts) => {
                if let Err(e) = state.cache.set(&cache_key, &counts).await {
                    tracing::warn!("Failed to cache active member counts: {}", e);
                }
                counts
            }
            Err(e) => {
                tracing::error!("Failed to count active members: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to count active members",
                    "Member counts are temporarily unavailable".to_string(),
                );
            }
        },
    };

    HttpResponse::Ok().json(ActiveMembersResponse {
        last_four_months: counts.last_four_months,
        last_week: counts.last_week,
        displayable: counts.is_displayable(),
    })
}
