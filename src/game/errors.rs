use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::game::matches::MatchStatus;

/// Errors raised by a single fixture's state machine
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum MatchError {
    #[error("Invalid match transition from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },

    #[error("Match {0} is already finished")]
    AlreadyFinished(String),

    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Invalid match data: {0}")]
    Invalid(String),
}

/// Errors raised by game orchestration
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum GameError {
    #[error("Player {0} is not part of this game")]
    UnknownPlayer(Uuid),

    #[error("Match {0} is not part of this game")]
    UnknownMatch(String),

    #[error("Bet on match {0} is not modifiable anymore")]
    BetNotModifiable(String),

    #[error("Match {0} is not finished, scores cannot be computed")]
    MatchNotFinished(String),

    #[error("Scores for match {0} have already been applied")]
    ScoresAlreadyApplied(String),

    #[error("Scores for match {match_id} do not cover every bet ({expected} bets, {actual} scores)")]
    IncompleteScores {
        match_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Scores for match {match_id} were computed by game {game_id}")]
    ScoresFromAnotherGame { match_id: String, game_id: Uuid },

    #[error("Match {0} has already been scored, its result cannot change")]
    MatchAlreadyScored(String),

    #[error("Player {0} is already registered")]
    DuplicatePlayer(Uuid),

    #[error("Match {0} is already registered")]
    DuplicateMatch(String),

    #[error("Match {match_id} belongs to {competition_code}/{season_code}, not to this game")]
    MatchOutsideCompetition {
        match_id: String,
        competition_code: String,
        season_code: String,
    },

    #[error("Game is finished and does not accept changes")]
    GameFinished,

    #[error("Game is already finished")]
    AlreadyFinished,

    #[error(transparent)]
    Match(#[from] MatchError),
}
