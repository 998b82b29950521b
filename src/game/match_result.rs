use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::game::bet::Bet;
use crate::game::errors::GameError;
use crate::game::matches::{Match, MatchHandle};

/// A match joined with every bet placed on it and, once scored, every player's points.
///
/// Scores are either absent or cover exactly the set of bettors.
#[derive(Debug, Clone)]
pub struct MatchResult {
    fixture: MatchHandle,
    bets: HashMap<Uuid, Bet>,
    scores: Option<HashMap<Uuid, i32>>,
}

impl MatchResult {
    pub fn new(fixture: MatchHandle) -> Self {
        Self {
            fixture,
            bets: HashMap::new(),
            scores: None,
        }
    }

    pub fn fixture(&self) -> &MatchHandle {
        &self.fixture
    }

    pub fn bets(&self) -> &HashMap<Uuid, Bet> {
        &self.bets
    }

    pub fn bet_for(&self, player_id: Uuid) -> Option<&Bet> {
        self.bets.get(&player_id)
    }

    pub fn scores(&self) -> Option<&HashMap<Uuid, i32>> {
        self.scores.as_ref()
    }

    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }

    /// Replaces any earlier bet of the same player
    pub(crate) fn upsert_bet(&mut self, player_id: Uuid, bet: Bet) -> Result<(), GameError> {
        if self.is_scored() {
            return Err(GameError::ScoresAlreadyApplied(self.fixture.id()));
        }
        self.bets.insert(player_id, bet);
        Ok(())
    }

    /// All or nothing: the map must hold one score per bettor and nothing else
    pub(crate) fn apply_scores(&mut self, scores: HashMap<Uuid, i32>) -> Result<(), GameError> {
        let match_id = self.fixture.id();
        if self.is_scored() {
            return Err(GameError::ScoresAlreadyApplied(match_id));
        }

        let covers_every_bet = {
            let bettors: HashSet<&Uuid> = self.bets.keys().collect();
            let scored: HashSet<&Uuid> = scores.keys().collect();
            bettors == scored
        };
        if !covers_every_bet {
            return Err(GameError::IncompleteScores {
                match_id,
                expected: self.bets.len(),
                actual: scores.len(),
            });
        }

        self.scores = Some(scores);
        Ok(())
    }

    pub(crate) fn replace_fixture(&self, m: Box<dyn Match>) {
        self.fixture.replace(m);
    }
}
