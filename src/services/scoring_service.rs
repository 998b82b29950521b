use std::sync::Arc;

use crate::db::game_store::GameStore;
use crate::game::{Game, GameError, MatchScores};

/// Outcome of one pass over every running game
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScoringCycleResult {
    pub games_checked: usize,
    pub matches_scored: usize,
    pub errors: Vec<String>,
}

/// Calculates the scores of a finished match and applies them to the game.
/// The caller holds the game lock for the whole call.
pub(crate) fn score_finished_match(game: &mut Game, match_id: &str) -> Result<MatchScores, GameError> {
    let scores = game.calculate_match_scores(match_id)?;
    let applied = scores.clone();
    game.apply_match_scores(scores)?;
    Ok(applied)
}

/// Scores every finished match nobody has scored yet
#[derive(Debug, Clone)]
pub struct ScoringService {
    store: Arc<GameStore>,
}

impl ScoringService {
    pub fn new(store: Arc<GameStore>) -> Self {
        Self { store }
    }

    pub async fn run_scoring_cycle(&self) -> ScoringCycleResult {
        let mut result = ScoringCycleResult::default();

        for game_ref in self.store.all().await {
            let mut game = game_ref.lock().await;
            if game.is_finished() {
                continue;
            }
            result.games_checked += 1;

            for match_id in game.matches_to_score() {
                match score_finished_match(&mut game, &match_id) {
                    Ok(scores) => {
                        tracing::info!(
                            "Scored match {} in game {} for {} bets",
                            match_id,
                            game.id(),
                            scores.scores().len()
                        );
                        result.matches_scored += 1;
                    }
                    Err(e) => {
                        let error_msg = format!("Game {} match {}: {}", game.id(), match_id, e);
                        tracing::error!("Scoring failed: {}", error_msg);
                        result.errors.push(error_msg);
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{OddsWeightedScorer, PlayerData, StaticMatch};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_cycle_scores_only_finished_matches_once() {
        let store = Arc::new(GameStore::new());
        let mut game = Game::new(
            "Pool",
            StaticMatch::SEASON_CODE,
            StaticMatch::COMPETITION_CODE,
            Arc::new(OddsWeightedScorer::default()),
        );
        let now = Utc::now();
        let alice = game.add_player(PlayerData::new("Alice")).unwrap();
        let played = game
            .add_match(Box::new(StaticMatch::scheduled("A", "B", now + Duration::hours(1))))
            .unwrap()
            .id();
        let pending = game
            .add_match(Box::new(StaticMatch::scheduled("C", "D", now + Duration::hours(1))))
            .unwrap()
            .id();
        game.add_player_bet(alice.as_ref(), game.new_bet(&played, 1, 0).unwrap(), now)
            .unwrap();
        game.finish_match(&played, 2, 0).unwrap();
        let game_ref = store.insert(game).await;

        let service = ScoringService::new(store);
        let first = service.run_scoring_cycle().await;
        assert_eq!(first.games_checked, 1);
        assert_eq!(first.matches_scored, 1);
        assert!(first.errors.is_empty());

        let second = service.run_scoring_cycle().await;
        assert_eq!(second.matches_scored, 0);

        let game = game_ref.lock().await;
        assert!(game.match_result(&played).unwrap().is_scored());
        assert!(!game.match_result(&pending).unwrap().is_scored());
        assert!(game.get_players_points()[&alice.id()] > 0);
        assert!(!game.match_handle(&pending).unwrap().read().is_finished());
    }
}
