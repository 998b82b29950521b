use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::bet::{Bet, BetRecord};
use crate::game::errors::{GameError, MatchError};
use crate::game::match_result::MatchResult;
use crate::game::matches::{Match, MatchHandle, MatchStatus};
use crate::game::player::Player;
use crate::game::scoring::{MatchScores, ScoringPolicy};
use crate::game::validation::MatchValidator;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::NotStarted => "not_started",
            GameStatus::InProgress => "in_progress",
            GameStatus::Finished => "finished",
        }
    }
}

/// One running competition instance: its players, the fixtures they bet on
/// and everybody's running total.
#[derive(Debug)]
pub struct Game {
    id: Uuid,
    name: String,
    season_code: String,
    competition_code: String,
    status: GameStatus,
    players: Vec<Arc<dyn Player>>,
    match_results: HashMap<String, MatchResult>,
    players_points: HashMap<Uuid, i32>,
    scorer: Arc<dyn ScoringPolicy>,
}

impl Game {
    pub fn new(
        name: impl Into<String>,
        season_code: impl Into<String>,
        competition_code: impl Into<String>,
        scorer: Arc<dyn ScoringPolicy>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            season_code: season_code.into(),
            competition_code: competition_code.into(),
            status: GameStatus::NotStarted,
            players: Vec::new(),
            match_results: HashMap::new(),
            players_points: HashMap::new(),
            scorer,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn season_code(&self) -> &str {
        &self.season_code
    }

    pub fn competition_code(&self) -> &str {
        &self.competition_code
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Arc<dyn Player>] {
        &self.players
    }

    pub fn player(&self, player_id: Uuid) -> Option<Arc<dyn Player>> {
        self.players.iter().find(|p| p.id() == player_id).cloned()
    }

    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.players.iter().any(|p| p.id() == player_id)
    }

    pub fn add_player<P: Player + 'static>(&mut self, player: P) -> Result<Arc<dyn Player>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        if self.has_player(player.id()) {
            return Err(GameError::DuplicatePlayer(player.id()));
        }

        let player: Arc<dyn Player> = Arc::new(player);
        self.players_points.insert(player.id(), 0);
        self.players.push(player.clone());
        tracing::info!("Player {} ({}) joined game {}", player.name(), player.id(), self.id);
        Ok(player)
    }

    /// Registers a fixture of this game's competition season
    pub fn add_match(&mut self, m: Box<dyn Match>) -> Result<MatchHandle, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }

        let match_id = m.id();
        if m.competition_code() != self.competition_code || m.season_code() != self.season_code {
            return Err(GameError::MatchOutsideCompetition {
                match_id,
                competition_code: m.competition_code().to_string(),
                season_code: m.season_code().to_string(),
            });
        }
        if self.match_results.contains_key(&match_id) {
            return Err(GameError::DuplicateMatch(match_id));
        }

        let handle = MatchHandle::from_boxed(m);
        self.match_results
            .insert(match_id.clone(), MatchResult::new(handle.clone()));
        self.refresh_status();
        tracing::debug!("Match {} added to game {}", match_id, self.id);
        Ok(handle)
    }

    pub fn has_match(&self, match_id: &str) -> bool {
        self.match_results.contains_key(match_id)
    }

    pub fn match_handle(&self, match_id: &str) -> Option<MatchHandle> {
        self.match_results.get(match_id).map(|r| r.fixture().clone())
    }

    pub fn match_result(&self, match_id: &str) -> Option<&MatchResult> {
        self.match_results.get(match_id)
    }

    /// Every match result, by kickoff
    pub fn match_results(&self) -> Vec<&MatchResult> {
        let mut results: Vec<&MatchResult> = self.match_results.values().collect();
        results.sort_by_cached_key(|r| {
            let m = r.fixture().read();
            (m.date(), m.id())
        });
        results
    }

    fn result_for(&self, match_id: &str) -> Result<&MatchResult, GameError> {
        self.match_results
            .get(match_id)
            .ok_or_else(|| GameError::UnknownMatch(match_id.to_string()))
    }

    /// A bet bound to this game's copy of the match
    pub fn new_bet(&self, match_id: &str, predicted_home_goals: u32, predicted_away_goals: u32) -> Result<Bet, GameError> {
        let result = self.result_for(match_id)?;
        Ok(Bet::new(
            result.fixture().clone(),
            predicted_home_goals,
            predicted_away_goals,
        ))
    }

    pub fn bet_from_record(&self, record: &BetRecord) -> Result<Bet, GameError> {
        self.new_bet(
            &record.match_id,
            record.predicted_home_goals,
            record.predicted_away_goals,
        )
    }

    /// Rebinds a bet built elsewhere onto this game's handle for the same match
    fn bind_bet(&self, bet: &Bet) -> Result<Bet, GameError> {
        self.new_bet(
            &bet.match_id(),
            bet.predicted_home_goals(),
            bet.predicted_away_goals(),
        )
    }

    pub fn check_player_bet_validity(
        &self,
        player: &dyn Player,
        bet: &Bet,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        if !self.has_player(player.id()) {
            return Err(GameError::UnknownPlayer(player.id()));
        }
        MatchValidator::new().validate_prediction(bet.predicted_home_goals(), bet.predicted_away_goals())?;

        let bound = self.bind_bet(bet)?;
        if !bound.is_modifiable(now) {
            return Err(GameError::BetNotModifiable(bound.match_id()));
        }
        Ok(())
    }

    /// Inserts or replaces the player's bet on the bet's match
    pub fn add_player_bet(
        &mut self,
        player: &dyn Player,
        bet: Bet,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        self.check_player_bet_validity(player, &bet, now)?;

        let bound = self.bind_bet(&bet)?;
        let match_id = bound.match_id();
        let result = self
            .match_results
            .get_mut(&match_id)
            .ok_or_else(|| GameError::UnknownMatch(match_id.clone()))?;
        result.upsert_bet(player.id(), bound)?;

        tracing::debug!(
            "Player {} bet {}-{} on match {} in game {}",
            player.id(),
            bet.predicted_home_goals(),
            bet.predicted_away_goals(),
            match_id,
            self.id
        );
        Ok(())
    }

    /// Every bet of one player, by kickoff
    pub fn bets_for_player(&self, player_id: Uuid) -> Vec<&Bet> {
        self.match_results()
            .into_iter()
            .filter_map(|r| r.bet_for(player_id))
            .collect()
    }

    /// Runs the scoring policy over every bet on a finished match
    pub fn calculate_match_scores(&self, match_id: &str) -> Result<MatchScores, GameError> {
        let result = self.result_for(match_id)?;
        if result.is_scored() {
            return Err(GameError::ScoresAlreadyApplied(match_id.to_string()));
        }

        let snapshot = result.fixture().snapshot();
        if !snapshot.is_finished() {
            return Err(GameError::MatchNotFinished(match_id.to_string()));
        }

        let scores = result
            .bets()
            .iter()
            .map(|(player_id, bet)| (*player_id, self.scorer.compute_score(bet, snapshot.as_ref())))
            .collect();

        Ok(MatchScores::new(self.id, match_id.to_string(), scores))
    }

    /// The only place where running totals change. Either every score of the
    /// match is applied or none is.
    pub fn apply_match_scores(&mut self, scores: MatchScores) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }

        let (game_id, match_id, scores) = scores.into_parts();
        if game_id != self.id {
            return Err(GameError::ScoresFromAnotherGame { match_id, game_id });
        }
        let result = self
            .match_results
            .get_mut(&match_id)
            .ok_or_else(|| GameError::UnknownMatch(match_id.clone()))?;
        if !result.fixture().read().is_finished() {
            return Err(GameError::MatchNotFinished(match_id));
        }
        result.apply_scores(scores)?;

        if let Some(applied) = result.scores() {
            for (player_id, points) in applied {
                *self.players_points.entry(*player_id).or_insert(0) += points;
            }
            tracing::info!(
                "Applied scores of match {} for {} players in game {}",
                match_id,
                applied.len(),
                self.id
            );
        }

        self.refresh_status();
        Ok(())
    }

    /// Replaces the stored fixture with fresher data from the feed. Bets already
    /// collected are kept and see the new state.
    pub fn update_match(&mut self, m: Box<dyn Match>) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }

        let match_id = m.id();
        let result = self.result_for(&match_id)?;
        let current = result.fixture().snapshot();

        if m.status() < current.status() {
            return Err(MatchError::InvalidTransition {
                from: current.status(),
                to: m.status(),
            }
            .into());
        }
        if result.is_scored()
            && (m.home_goals() != current.home_goals() || m.away_goals() != current.away_goals())
        {
            return Err(GameError::MatchAlreadyScored(match_id));
        }

        result.replace_fixture(m);
        self.refresh_status();
        tracing::debug!("Match {} updated in game {}", match_id, self.id);
        Ok(())
    }

    pub fn start_match(&mut self, match_id: &str) -> Result<(), GameError> {
        self.result_for(match_id)?.fixture().start()?;
        self.refresh_status();
        Ok(())
    }

    pub fn finish_match(&mut self, match_id: &str, home_goals: u32, away_goals: u32) -> Result<(), GameError> {
        self.result_for(match_id)?
            .fixture()
            .finish(home_goals, away_goals)?;
        self.refresh_status();
        Ok(())
    }

    /// Finished matches whose scores have not been applied yet
    pub fn matches_to_score(&self) -> Vec<String> {
        self.match_results()
            .into_iter()
            .filter(|r| !r.is_scored() && r.fixture().read().is_finished())
            .map(|r| r.fixture().id())
            .collect()
    }

    pub fn get_players_points(&self) -> HashMap<Uuid, i32> {
        self.players_points.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// The competition behind the game is over
    pub fn finish(&mut self) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::AlreadyFinished);
        }
        self.status = GameStatus::Finished;
        tracing::info!("Game {} finished", self.id);
        Ok(())
    }

    /// Every player holding the highest total, ties included
    pub fn get_winner(&self) -> Vec<Arc<dyn Player>> {
        let Some(best) = self.players_points.values().max().copied() else {
            return Vec::new();
        };
        self.players
            .iter()
            .filter(|p| self.players_points.get(&p.id()).copied() == Some(best))
            .cloned()
            .collect()
    }

    fn refresh_status(&mut self) {
        if self.status != GameStatus::NotStarted {
            return;
        }
        let underway = self
            .match_results
            .values()
            .any(|r| r.is_scored() || r.fixture().read().status() != MatchStatus::Scheduled);
        if underway {
            self.status = GameStatus::InProgress;
        }
    }
}
