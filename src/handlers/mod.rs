use actix_web::HttpResponse;

use crate::game::{GameError, MatchError};
use crate::models::common::ApiResponse;
use crate::services::game_service::ServiceError;

pub mod backend_health_handler;
pub mod bet_handler;
pub mod game_handler;
pub mod match_handler;

/// Maps a failed operation onto its HTTP status
pub fn error_response(error: &ServiceError) -> HttpResponse {
    let body = ApiResponse::error(error.to_string());
    match error {
        ServiceError::GameNotFound(_)
        | ServiceError::Game(GameError::UnknownPlayer(_))
        | ServiceError::Game(GameError::UnknownMatch(_)) => HttpResponse::NotFound().json(body),

        ServiceError::Validation(_)
        | ServiceError::Game(GameError::DuplicatePlayer(_))
        | ServiceError::Game(GameError::DuplicateMatch(_))
        | ServiceError::Game(GameError::MatchOutsideCompetition { .. })
        | ServiceError::Game(GameError::IncompleteScores { .. })
        | ServiceError::Game(GameError::Match(MatchError::InvalidOdds(_)))
        | ServiceError::Game(GameError::Match(MatchError::Invalid(_))) => {
            HttpResponse::BadRequest().json(body)
        }

        ServiceError::Game(_) => HttpResponse::Conflict().json(body),
    }
}
