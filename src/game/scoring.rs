use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::bet::Bet;
use crate::game::matches::{Match, Outcome};

/// Turns a bet on a finished match into points.
///
/// Implementations must give a perfect bet more than a bet that only has the
/// right outcome, and a wrong outcome 0.
pub trait ScoringPolicy: fmt::Debug + Send + Sync {
    fn compute_score(&self, bet: &Bet, m: &dyn Match) -> i32;
}

/// Point weights, loaded from the `scoring` section of the configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoringSettings {
    pub correct_points: u32,
    pub goal_difference_bonus: u32,
    pub total_goals_bonus: u32,
    pub perfect_bonus: u32,
    pub upset_weight: f64,
    pub max_upset_multiplier: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            correct_points: 100,
            goal_difference_bonus: 50,
            total_goals_bonus: 25,
            perfect_bonus: 200,
            upset_weight: 0.25,
            max_upset_multiplier: 3.0,
        }
    }
}

/// Default policy: flat points for the right outcome, bonuses for the right
/// margin, the right goal count and the exact score, all scaled up when the
/// underdog won.
#[derive(Debug, Clone)]
pub struct OddsWeightedScorer {
    settings: ScoringSettings,
}

impl Default for OddsWeightedScorer {
    fn default() -> Self {
        Self::new(ScoringSettings::default())
    }
}

impl OddsWeightedScorer {
    pub fn new(mut settings: ScoringSettings) -> Self {
        // perfect > correct > incorrect must hold whatever the configuration says
        settings.correct_points = settings.correct_points.max(1);
        settings.perfect_bonus = settings.perfect_bonus.max(1);
        if !settings.upset_weight.is_finite() || settings.upset_weight < 0.0 {
            settings.upset_weight = 0.0;
        }
        if !settings.max_upset_multiplier.is_finite() || settings.max_upset_multiplier < 1.0 {
            settings.max_upset_multiplier = 1.0;
        }
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Always >= 1.0. Only grows when the side with the longer odds won.
    pub fn upset_multiplier(&self, m: &dyn Match) -> f64 {
        let odds_difference = m.absolute_difference_odds_between_home_and_away();
        if odds_difference == 0.0 {
            return 1.0;
        }

        let underdog_won = match m.outcome() {
            Outcome::HomeWin => m.home_team_odds() > m.away_team_odds(),
            Outcome::AwayWin => m.away_team_odds() > m.home_team_odds(),
            Outcome::Draw => false,
        };
        if !underdog_won {
            return 1.0;
        }

        (1.0 + odds_difference * self.settings.upset_weight).min(self.settings.max_upset_multiplier)
    }
}

impl ScoringPolicy for OddsWeightedScorer {
    fn compute_score(&self, bet: &Bet, m: &dyn Match) -> i32 {
        if !bet.is_bet_correct() {
            return 0;
        }

        let mut points = self.settings.correct_points;
        if bet.is_goal_difference_the_same_as_match() {
            points += self.settings.goal_difference_bonus;
        }
        if bet.absolute_difference_total_goals_with_match() == 0 {
            points += self.settings.total_goals_bonus;
        }
        if bet.is_bet_perfect() {
            points += self.settings.perfect_bonus;
        }

        (points as f64 * self.upset_multiplier(m)).round() as i32
    }
}

/// Points of every bettor on one finished match.
///
/// Only `Game::calculate_match_scores` builds these, so a value always covers
/// every bet of its match. It can only be applied to the game that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScores {
    game_id: Uuid,
    match_id: String,
    scores: HashMap<Uuid, i32>,
}

impl MatchScores {
    pub(crate) fn new(game_id: Uuid, match_id: String, scores: HashMap<Uuid, i32>) -> Self {
        Self {
            game_id,
            match_id,
            scores,
        }
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn scores(&self) -> &HashMap<Uuid, i32> {
        &self.scores
    }

    pub fn score_for(&self, player_id: Uuid) -> Option<i32> {
        self.scores.get(&player_id).copied()
    }

    pub(crate) fn into_parts(self) -> (Uuid, String, HashMap<Uuid, i32>) {
        (self.game_id, self.match_id, self.scores)
    }
}
