use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::error_response;
use crate::models::common::ApiResponse;
use crate::models::game::{AddPlayerRequest, CreateGameRequest};
use crate::services::game_service::GameService;

#[tracing::instrument(
    name = "Create game",
    skip(request, service),
    fields(
        name = %request.name,
        competition = %request.competition_code,
        season = %request.season_code
    )
)]
pub async fn create_game(
    request: web::Json<CreateGameRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.create_game(request.into_inner()).await {
        Ok(game) => Ok(HttpResponse::Created().json(ApiResponse::success("Game created", game))),
        Err(e) => {
            tracing::error!("Failed to create game: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "List games", skip(service))]
pub async fn list_games(service: web::Data<GameService>) -> Result<HttpResponse> {
    let games = service.list_games().await;
    tracing::info!("Listing {} games", games.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success("Games retrieved", games)))
}

#[tracing::instrument(name = "Get game", skip(service), fields(game_id = %game_id))]
pub async fn get_game(game_id: Uuid, service: web::Data<GameService>) -> Result<HttpResponse> {
    match service.get_game(game_id).await {
        Ok(game) => Ok(HttpResponse::Ok().json(ApiResponse::success("Game retrieved", game))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[tracing::instrument(
    name = "Add player",
    skip(request, service),
    fields(game_id = %game_id, player_name = %request.name)
)]
pub async fn add_player(
    game_id: Uuid,
    request: web::Json<AddPlayerRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match service.add_player(game_id, request.into_inner()).await {
        Ok(player) => {
            tracing::info!("Player {} added to game {}", player.id, game_id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Player added", player)))
        }
        Err(e) => {
            tracing::error!("Failed to add player to game {}: {}", game_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Get leaderboard", skip(service), fields(game_id = %game_id))]
pub async fn get_leaderboard(game_id: Uuid, service: web::Data<GameService>) -> Result<HttpResponse> {
    match service.leaderboard(game_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard retrieved", entries))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[tracing::instrument(name = "Get winners", skip(service), fields(game_id = %game_id))]
pub async fn get_winners(game_id: Uuid, service: web::Data<GameService>) -> Result<HttpResponse> {
    match service.winners(game_id).await {
        Ok(winners) => Ok(HttpResponse::Ok().json(ApiResponse::success("Winners retrieved", winners))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[tracing::instrument(name = "Finish game", skip(service), fields(game_id = %game_id))]
pub async fn finish_game(game_id: Uuid, service: web::Data<GameService>) -> Result<HttpResponse> {
    match service.finish_game(game_id).await {
        Ok(winners) => {
            tracing::info!("Game {} finished with {} winners", game_id, winners.winners.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success("Game finished", winners)))
        }
        Err(e) => {
            tracing::error!("Failed to finish game {}: {}", game_id, e);
            Ok(error_response(&e))
        }
    }
}
