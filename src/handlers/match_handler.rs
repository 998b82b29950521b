use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use uuid::Uuid;

use crate::handlers::error_response;
use crate::models::common::ApiResponse;
use crate::models::game::{FinishMatchRequest, MatchPayload};
use crate::services::game_service::GameService;

#[tracing::instrument(
    name = "Add match",
    skip(payload, service),
    fields(
        game_id = %game_id,
        home_team = %payload.home_team,
        away_team = %payload.away_team,
        matchday = payload.matchday
    )
)]
pub async fn add_match(
    game_id: Uuid,
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.add_match(game_id, payload.into_inner()).await {
        Ok(fixture) => {
            tracing::info!("Match {} added to game {}", fixture.id, game_id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Match added", fixture)))
        }
        Err(e) => {
            tracing::error!("Failed to add match to game {}: {}", game_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(
    name = "Update match",
    skip(payload, service),
    fields(game_id = %game_id, home_team = %payload.home_team, away_team = %payload.away_team)
)]
pub async fn update_match(
    game_id: Uuid,
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.update_match(game_id, payload.into_inner()).await {
        Ok(fixture) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match updated", fixture))),
        Err(e) => {
            tracing::error!("Failed to update match in game {}: {}", game_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(
    name = "Ingest match",
    skip(payload, service),
    fields(home_team = %payload.home_team, away_team = %payload.away_team)
)]
pub async fn ingest_match(
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.ingest_match(payload.into_inner()).await {
        Ok(game_ids) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            format!("Match update applied to {} games", game_ids.len()),
            json!({ "updated_games": game_ids }),
        ))),
        Err(e) => {
            tracing::error!("Failed to ingest match: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Start match", skip(service), fields(game_id = %game_id, match_id = %match_id))]
pub async fn start_match(
    game_id: Uuid,
    match_id: String,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.start_match(game_id, &match_id).await {
        Ok(fixture) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match started", fixture))),
        Err(e) => {
            tracing::warn!("Failed to start match {}: {}", match_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(
    name = "Finish match",
    skip(request, service),
    fields(
        game_id = %game_id,
        match_id = %match_id,
        home_goals = request.home_goals,
        away_goals = request.away_goals
    )
)]
pub async fn finish_match(
    game_id: Uuid,
    match_id: String,
    request: web::Json<FinishMatchRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.finish_match(game_id, &match_id, request.into_inner()).await {
        Ok(fixture) => {
            tracing::info!("Match {} finished {:?}-{:?}", match_id, fixture.home_goals, fixture.away_goals);
            Ok(HttpResponse::Ok().json(ApiResponse::success("Match finished", fixture)))
        }
        Err(e) => {
            tracing::warn!("Failed to finish match {}: {}", match_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Score match", skip(service), fields(game_id = %game_id, match_id = %match_id))]
pub async fn score_match(
    game_id: Uuid,
    match_id: String,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.score_match(game_id, &match_id).await {
        Ok(scores) => {
            tracing::info!("Scored {} bets on match {}", scores.scores.len(), match_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success("Match scored", scores)))
        }
        Err(e) => {
            tracing::error!("Failed to score match {}: {}", match_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Get match result", skip(service), fields(game_id = %game_id, match_id = %match_id))]
pub async fn get_match_result(
    game_id: Uuid,
    match_id: String,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.match_result(game_id, &match_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match result retrieved", result))),
        Err(e) => Ok(error_response(&e)),
    }
}
