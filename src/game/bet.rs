use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::matches::{MatchHandle, Outcome, DRAW};

/// One player's scoreline prediction for one match.
///
/// The bet reads the match through a shared [`MatchHandle`], so the final
/// score becomes visible to it as soon as the match is finished anywhere.
#[derive(Debug, Clone)]
pub struct Bet {
    fixture: MatchHandle,
    predicted_home_goals: u32,
    predicted_away_goals: u32,
}

/// Serialized form of a bet, the match is referenced by id
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BetRecord {
    pub match_id: String,
    pub predicted_home_goals: u32,
    pub predicted_away_goals: u32,
}

impl Bet {
    pub fn new(fixture: MatchHandle, predicted_home_goals: u32, predicted_away_goals: u32) -> Self {
        Self {
            fixture,
            predicted_home_goals,
            predicted_away_goals,
        }
    }

    pub fn fixture(&self) -> &MatchHandle {
        &self.fixture
    }

    pub fn match_id(&self) -> String {
        self.fixture.id()
    }

    pub fn predicted_home_goals(&self) -> u32 {
        self.predicted_home_goals
    }

    pub fn predicted_away_goals(&self) -> u32 {
        self.predicted_away_goals
    }

    pub fn predicted_outcome(&self) -> Outcome {
        Outcome::from_goals(self.predicted_home_goals, self.predicted_away_goals)
    }

    /// Same three-way result as the match, the exact scoreline is irrelevant
    pub fn is_bet_correct(&self) -> bool {
        self.predicted_outcome() == self.fixture.read().outcome()
    }

    pub fn is_bet_perfect(&self) -> bool {
        let m = self.fixture.read();
        self.predicted_home_goals == m.home_goals() && self.predicted_away_goals == m.away_goals()
    }

    pub fn absolute_goal_difference(&self) -> u32 {
        self.predicted_home_goals.abs_diff(self.predicted_away_goals)
    }

    pub fn absolute_difference_goal_difference_with_match(&self) -> u32 {
        self.fixture
            .read()
            .absolute_goal_difference()
            .abs_diff(self.absolute_goal_difference())
    }

    pub fn is_goal_difference_the_same_as_match(&self) -> bool {
        self.absolute_difference_goal_difference_with_match() == 0
    }

    pub fn total_predicted_goals(&self) -> u32 {
        self.predicted_home_goals.saturating_add(self.predicted_away_goals)
    }

    pub fn absolute_difference_total_goals_with_match(&self) -> u32 {
        self.total_predicted_goals()
            .abs_diff(self.fixture.read().total_goals())
    }

    /// Predicted winner's team name, or "Draw". Does not look at the match result.
    pub fn get_predicted_result(&self) -> String {
        let m = self.fixture.read();
        match self.predicted_outcome() {
            Outcome::HomeWin => m.home_team().to_string(),
            Outcome::AwayWin => m.away_team().to_string(),
            Outcome::Draw => DRAW.to_string(),
        }
    }

    /// A bet can only be written while its match has not kicked off
    pub fn is_modifiable(&self, now: DateTime<Utc>) -> bool {
        let m = self.fixture.read();
        !m.is_finished() && !m.is_in_progress() && now < m.date()
    }

    pub fn to_record(&self) -> BetRecord {
        BetRecord {
            match_id: self.match_id(),
            predicted_home_goals: self.predicted_home_goals,
            predicted_away_goals: self.predicted_away_goals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::matches::StaticMatch;
    use chrono::Duration;

    fn bet_on(home_goals: u32, away_goals: u32, predicted: (u32, u32)) -> Bet {
        let handle = MatchHandle::new(StaticMatch::finished("Home", "Away", home_goals, away_goals));
        Bet::new(handle, predicted.0, predicted.1)
    }

    #[test]
    fn test_perfect_bet_is_correct() {
        let bet = bet_on(2, 1, (2, 1));
        assert!(bet.is_bet_perfect());
        assert!(bet.is_bet_correct());
        assert_eq!(bet.absolute_difference_total_goals_with_match(), 0);
    }

    #[test]
    fn test_wrong_outcome() {
        let bet = bet_on(0, 1, (1, 0));
        assert!(!bet.is_bet_correct());
        assert!(!bet.is_bet_perfect());
        assert!(bet.is_goal_difference_the_same_as_match());
        assert_eq!(bet.get_predicted_result(), "Home");
    }

    #[test]
    fn test_total_goals_delta() {
        let bet = bet_on(4, 1, (2, 0));
        assert_eq!(bet.total_predicted_goals(), 2);
        assert_eq!(bet.absolute_difference_total_goals_with_match(), 3);
        assert_eq!(bet.absolute_difference_goal_difference_with_match(), 1);
    }

    #[test]
    fn test_huge_prediction_does_not_overflow() {
        let bet = bet_on(2, 1, (u32::MAX, 1));
        assert_eq!(bet.total_predicted_goals(), u32::MAX);
        assert_eq!(bet.absolute_difference_total_goals_with_match(), u32::MAX - 3);
        assert!(bet.is_bet_correct());
    }

    #[test]
    fn test_bet_on_live_match_is_not_modifiable() {
        let now = Utc::now();
        let handle = MatchHandle::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(1)));
        let bet = Bet::new(handle.clone(), 1, 1);
        assert!(bet.is_modifiable(now));
        handle.start().unwrap();
        assert!(!bet.is_modifiable(now));
    }
}
