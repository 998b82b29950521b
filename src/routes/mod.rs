use actix_web::web;

pub mod backend_health;
pub mod game;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(game::create_game)
        .service(game::list_games)
        .service(game::get_game)
        .service(game::add_player)
        .service(game::add_match)
        .service(game::update_match)
        .service(game::ingest_match)
        .service(game::get_match_result)
        .service(game::start_match)
        .service(game::finish_match)
        .service(game::score_match)
        .service(game::place_bet)
        .service(game::get_player_bets)
        .service(game::get_leaderboard)
        .service(game::get_winners)
        .service(game::finish_game);
}
