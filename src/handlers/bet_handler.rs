use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::handlers::error_response;
use crate::models::common::ApiResponse;
use crate::models::game::PlaceBetRequest;
use crate::services::game_service::GameService;

#[tracing::instrument(
    name = "Place bet",
    skip(request, service),
    fields(
        game_id = %game_id,
        player_id = %request.player_id,
        match_id = %request.match_id
    )
)]
pub async fn place_bet(
    game_id: Uuid,
    request: web::Json<PlaceBetRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.place_bet(game_id, request.into_inner(), Utc::now()).await {
        Ok(bet) => {
            tracing::info!(
                "Bet {}-{} stored on match {}",
                bet.predicted_home_goals,
                bet.predicted_away_goals,
                bet.match_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success("Bet placed", bet)))
        }
        Err(e) => {
            tracing::warn!("Bet rejected in game {}: {}", game_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Get player bets", skip(service), fields(game_id = %game_id, player_id = %player_id))]
pub async fn get_player_bets(
    game_id: Uuid,
    player_id: Uuid,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.player_bets(game_id, player_id).await {
        Ok(bets) => Ok(HttpResponse::Ok().json(ApiResponse::success("Bets retrieved", bets))),
        Err(e) => Ok(error_response(&e)),
    }
}
