use actix_web::{get, post, put, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::{bet_handler, game_handler, match_handler};
use crate::models::game::*;
use crate::services::game_service::GameService;

/// Create a new game for one competition season
#[post("/games")]
async fn create_game(
    request: web::Json<CreateGameRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    game_handler::create_game(request, service).await
}

#[get("/games")]
async fn list_games(service: web::Data<GameService>) -> Result<HttpResponse> {
    game_handler::list_games(service).await
}

#[get("/games/{game_id}")]
async fn get_game(path: web::Path<Uuid>, service: web::Data<GameService>) -> Result<HttpResponse> {
    game_handler::get_game(path.into_inner(), service).await
}

#[post("/games/{game_id}/players")]
async fn add_player(
    path: web::Path<Uuid>,
    request: web::Json<AddPlayerRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    game_handler::add_player(path.into_inner(), request, service).await
}

#[post("/games/{game_id}/matches")]
async fn add_match(
    path: web::Path<Uuid>,
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match_handler::add_match(path.into_inner(), payload, service).await
}

/// Refresh a fixture of one game with feed data
#[put("/games/{game_id}/matches")]
async fn update_match(
    path: web::Path<Uuid>,
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match_handler::update_match(path.into_inner(), payload, service).await
}

/// Refresh a fixture in every game tracking it
#[put("/matches")]
async fn ingest_match(
    payload: web::Json<MatchPayload>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    match_handler::ingest_match(payload, service).await
}

#[get("/games/{game_id}/matches/{match_id}")]
async fn get_match_result(
    path: web::Path<(Uuid, String)>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    let (game_id, match_id) = path.into_inner();
    match_handler::get_match_result(game_id, match_id, service).await
}

#[post("/games/{game_id}/matches/{match_id}/start")]
async fn start_match(
    path: web::Path<(Uuid, String)>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    let (game_id, match_id) = path.into_inner();
    match_handler::start_match(game_id, match_id, service).await
}

#[post("/games/{game_id}/matches/{match_id}/finish")]
async fn finish_match(
    path: web::Path<(Uuid, String)>,
    request: web::Json<FinishMatchRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    let (game_id, match_id) = path.into_inner();
    match_handler::finish_match(game_id, match_id, request, service).await
}

/// Apply the scores of a finished match
#[post("/games/{game_id}/matches/{match_id}/score")]
async fn score_match(
    path: web::Path<(Uuid, String)>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    let (game_id, match_id) = path.into_inner();
    match_handler::score_match(game_id, match_id, service).await
}

/// Place or replace a bet
#[put("/games/{game_id}/bets")]
async fn place_bet(
    path: web::Path<Uuid>,
    request: web::Json<PlaceBetRequest>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    bet_handler::place_bet(path.into_inner(), request, service).await
}

#[get("/games/{game_id}/players/{player_id}/bets")]
async fn get_player_bets(
    path: web::Path<(Uuid, Uuid)>,
    service: web::Data<GameService>,
) -> Result<HttpResponse> {
    let (game_id, player_id) = path.into_inner();
    bet_handler::get_player_bets(game_id, player_id, service).await
}

#[get("/games/{game_id}/leaderboard")]
async fn get_leaderboard(path: web::Path<Uuid>, service: web::Data<GameService>) -> Result<HttpResponse> {
    game_handler::get_leaderboard(path.into_inner(), service).await
}

#[get("/games/{game_id}/winners")]
async fn get_winners(path: web::Path<Uuid>, service: web::Data<GameService>) -> Result<HttpResponse> {
    game_handler::get_winners(path.into_inner(), service).await
}

#[post("/games/{game_id}/finish")]
async fn finish_game(path: web::Path<Uuid>, service: web::Data<GameService>) -> Result<HttpResponse> {
    game_handler::finish_game(path.into_inner(), service).await
}
