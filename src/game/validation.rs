use crate::game::errors::MatchError;

/// Anything above this is treated as a data entry error from the feed
pub const MAX_REASONABLE_GOALS: u32 = 50;

/// Centralized validation for fixtures and results coming from outside
#[derive(Debug, Clone, Copy)]
pub struct MatchValidator;

impl Default for MatchValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate an imported fixture before it becomes a match
    pub fn validate_fixture(
        &self,
        home_team: &str,
        away_team: &str,
        competition_code: &str,
        season_code: &str,
        matchday: u32,
    ) -> Result<(), MatchError> {
        self.validate_team_name(home_team)?;
        self.validate_team_name(away_team)?;

        if home_team.trim().eq_ignore_ascii_case(away_team.trim()) {
            return Err(MatchError::Invalid(format!(
                "A team cannot play against itself: {}",
                home_team
            )));
        }

        self.validate_code("Competition code", competition_code)?;
        self.validate_code("Season code", season_code)?;

        if matchday == 0 {
            return Err(MatchError::Invalid("Matchday starts at 1".into()));
        }

        Ok(())
    }

    pub fn validate_team_name(&self, name: &str) -> Result<(), MatchError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(MatchError::Invalid("Team name cannot be empty".into()));
        }

        if trimmed_name.len() > 255 {
            return Err(MatchError::Invalid(
                "Team name too long (maximum 255 characters)".into(),
            ));
        }

        if trimmed_name.contains('\0') {
            return Err(MatchError::Invalid("Team name contains invalid characters".into()));
        }

        Ok(())
    }

    fn validate_code(&self, label: &str, code: &str) -> Result<(), MatchError> {
        if code.trim().is_empty() {
            return Err(MatchError::Invalid(format!("{} cannot be empty", label)));
        }
        Ok(())
    }

    /// Validate a final or live scoreline
    pub fn validate_goals(&self, home_goals: u32, away_goals: u32) -> Result<(), MatchError> {
        self.check_goal_limit("Home goals", home_goals)?;
        self.check_goal_limit("Away goals", away_goals)
    }

    /// Same bounds as a real scoreline
    pub fn validate_prediction(&self, predicted_home_goals: u32, predicted_away_goals: u32) -> Result<(), MatchError> {
        self.check_goal_limit("Predicted home goals", predicted_home_goals)?;
        self.check_goal_limit("Predicted away goals", predicted_away_goals)
    }

    fn check_goal_limit(&self, label: &str, goals: u32) -> Result<(), MatchError> {
        if goals > MAX_REASONABLE_GOALS {
            return Err(MatchError::Invalid(format!(
                "{} too high: {} (max {})",
                label, goals, MAX_REASONABLE_GOALS
            )));
        }
        Ok(())
    }
}
