pub mod bet;
pub mod errors;
pub mod game;
pub mod match_result;
pub mod matches;
pub mod player;
pub mod scoring;
pub mod validation;

pub use bet::{Bet, BetRecord};
pub use errors::{GameError, MatchError};
pub use game::{Game, GameStatus};
pub use match_result::MatchResult;
pub use matches::{match_id, Match, MatchHandle, MatchStatus, Outcome, SeasonMatch, StaticMatch, DRAW};
pub use player::{Player, PlayerData};
pub use scoring::{MatchScores, OddsWeightedScorer, ScoringPolicy, ScoringSettings};
pub use validation::MatchValidator;
