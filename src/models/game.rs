use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{
    Bet, BetRecord, Game, GameStatus, Match, MatchError, MatchResult, MatchScores, MatchStatus,
    MatchValidator, PlayerData, SeasonMatch,
};

// Request DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateGameRequest {
    pub name: String,
    pub season_code: String,
    pub competition_code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddPlayerRequest {
    pub name: String,
}

/// A fixture as delivered by the match feed
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchPayload {
    pub home_team: String,
    pub away_team: String,
    pub competition_code: String,
    pub season_code: String,
    pub matchday: u32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<MatchStatus>,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
    #[serde(default)]
    pub home_team_odds: Option<f64>,
    #[serde(default)]
    pub away_team_odds: Option<f64>,
    #[serde(default)]
    pub draw_odds: Option<f64>,
}

impl MatchPayload {
    pub fn into_season_match(self, validator: &MatchValidator) -> Result<SeasonMatch, MatchError> {
        validator.validate_fixture(
            &self.home_team,
            &self.away_team,
            &self.competition_code,
            &self.season_code,
            self.matchday,
        )?;

        let home_goals = self.home_goals.unwrap_or(0);
        let away_goals = self.away_goals.unwrap_or(0);
        validator.validate_goals(home_goals, away_goals)?;

        let status = self.status.unwrap_or(MatchStatus::Scheduled);
        if status == MatchStatus::Finished && (self.home_goals.is_none() || self.away_goals.is_none()) {
            return Err(MatchError::Invalid(
                "A finished match needs both home_goals and away_goals".into(),
            ));
        }

        Ok(SeasonMatch::new(
            self.home_team.trim(),
            self.away_team.trim(),
            self.season_code.trim(),
            self.competition_code.trim(),
            self.date,
            self.matchday,
        )
        .with_odds(
            self.home_team_odds.unwrap_or(0.0),
            self.away_team_odds.unwrap_or(0.0),
            self.draw_odds.unwrap_or(0.0),
        )?
        .with_state(status, home_goals, away_goals))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FinishMatchRequest {
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBetRequest {
    pub player_id: Uuid,
    pub match_id: String,
    pub predicted_home_goals: u32,
    pub predicted_away_goals: u32,
}

impl PlaceBetRequest {
    pub fn record(&self) -> BetRecord {
        BetRecord {
            match_id: self.match_id.clone(),
            predicted_home_goals: self.predicted_home_goals,
            predicted_away_goals: self.predicted_away_goals,
        }
    }
}

// Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameView {
    pub id: Uuid,
    pub name: String,
    pub season_code: String,
    pub competition_code: String,
    pub status: GameStatus,
    pub players: Vec<PlayerData>,
    pub match_count: usize,
    pub scored_match_count: usize,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let results = game.match_results();
        Self {
            id: game.id(),
            name: game.name().to_string(),
            season_code: game.season_code().to_string(),
            competition_code: game.competition_code().to_string(),
            status: game.status(),
            players: game
                .players()
                .iter()
                .map(|p| PlayerData::with_id(p.id(), p.name()))
                .collect(),
            match_count: results.len(),
            scored_match_count: results.iter().filter(|r| r.is_scored()).count(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchView {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub competition_code: String,
    pub season_code: String,
    pub matchday: u32,
    pub date: DateTime<Utc>,
    pub status: MatchStatus,
    /// Only once the match has kicked off
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub home_team_odds: f64,
    pub away_team_odds: f64,
    pub draw_odds: f64,
    /// Only once the match is finished
    pub winner: Option<String>,
}

impl From<&dyn Match> for MatchView {
    fn from(m: &dyn Match) -> Self {
        let kicked_off = m.status() != MatchStatus::Scheduled;
        Self {
            id: m.id(),
            home_team: m.home_team().to_string(),
            away_team: m.away_team().to_string(),
            competition_code: m.competition_code().to_string(),
            season_code: m.season_code().to_string(),
            matchday: m.matchday(),
            date: m.date(),
            status: m.status(),
            home_goals: kicked_off.then(|| m.home_goals()),
            away_goals: kicked_off.then(|| m.away_goals()),
            home_team_odds: m.home_team_odds(),
            away_team_odds: m.away_team_odds(),
            draw_odds: m.draw_odds(),
            winner: m.is_finished().then(|| m.get_winner()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BetView {
    pub match_id: String,
    pub predicted_home_goals: u32,
    pub predicted_away_goals: u32,
    pub predicted_result: String,
}

impl From<&Bet> for BetView {
    fn from(bet: &Bet) -> Self {
        Self {
            match_id: bet.match_id(),
            predicted_home_goals: bet.predicted_home_goals(),
            predicted_away_goals: bet.predicted_away_goals(),
            predicted_result: bet.get_predicted_result(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchResultView {
    #[serde(rename = "match")]
    pub fixture: MatchView,
    pub bets: HashMap<Uuid, BetRecord>,
    pub scores: Option<HashMap<Uuid, i32>>,
}

impl From<&MatchResult> for MatchResultView {
    fn from(result: &MatchResult) -> Self {
        let fixture = {
            let guard = result.fixture().read();
            MatchView::from(&**guard)
        };
        Self {
            fixture,
            bets: result
                .bets()
                .iter()
                .map(|(player_id, bet)| (*player_id, bet.to_record()))
                .collect(),
            scores: result.scores().cloned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchScoresView {
    pub match_id: String,
    pub scores: HashMap<Uuid, i32>,
}

impl From<&MatchScores> for MatchScoresView {
    fn from(scores: &MatchScores) -> Self {
        Self {
            match_id: scores.match_id().to_string(),
            scores: scores.scores().clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeaderboardEntry {
    pub position: u32,
    pub player_id: Uuid,
    pub player_name: String,
    pub points: i32,
}

impl LeaderboardEntry {
    /// Highest total first. Tied players share a position.
    pub fn standings(game: &Game) -> Vec<LeaderboardEntry> {
        let points = game.get_players_points();
        let mut rows: Vec<(Uuid, String, i32)> = game
            .players()
            .iter()
            .map(|p| (p.id(), p.name().to_string(), points.get(&p.id()).copied().unwrap_or(0)))
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));

        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len());
        for (index, (player_id, player_name, total)) in rows.into_iter().enumerate() {
            let position = match entries.last() {
                Some(previous) if previous.points == total => previous.position,
                _ => index as u32 + 1,
            };
            entries.push(LeaderboardEntry {
                position,
                player_id,
                player_name,
                points: total,
            });
        }
        entries
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WinnersView {
    pub game_id: Uuid,
    pub finished: bool,
    pub points: Option<i32>,
    pub winners: Vec<PlayerData>,
}

impl From<&Game> for WinnersView {
    fn from(game: &Game) -> Self {
        let winners: Vec<PlayerData> = game
            .get_winner()
            .iter()
            .map(|p| PlayerData::with_id(p.id(), p.name()))
            .collect();
        let points = winners
            .first()
            .and_then(|w| game.get_players_points().get(&w.id).copied());
        Self {
            game_id: game.id(),
            finished: game.is_finished(),
            points,
            winners,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> MatchPayload {
        serde_json::from_value(serde_json::json!({
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "competition_code": "PL",
            "season_code": "2024",
            "matchday": 5,
            "date": "2024-09-21T15:00:00Z",
            "home_team_odds": 1.9,
            "away_team_odds": 3.8,
            "draw_odds": 3.4
        }))
        .unwrap()
    }

    #[test]
    fn test_payload_defaults_to_scheduled_fixture() {
        let m = payload().into_season_match(&MatchValidator::new()).unwrap();
        assert_eq!(m.status(), MatchStatus::Scheduled);
        assert_eq!(m.id(), "PL-2024-Arsenal-Chelsea-5");
        let view = MatchView::from(&m as &dyn Match);
        assert!(view.home_goals.is_none());
        assert!(view.winner.is_none());
    }

    #[test]
    fn test_finished_payload_requires_goals() {
        let mut finished = payload();
        finished.status = Some(MatchStatus::Finished);
        finished.home_goals = Some(2);
        assert!(finished.clone().into_season_match(&MatchValidator::new()).is_err());

        finished.away_goals = Some(2);
        let m = finished.into_season_match(&MatchValidator::new()).unwrap();
        assert_eq!(MatchView::from(&m as &dyn Match).winner.as_deref(), Some("Draw"));
    }

    #[test]
    fn test_padded_feed_fields_keep_the_same_identity() {
        let mut padded = payload();
        padded.home_team = " Arsenal ".into();
        padded.competition_code = " PL".into();
        padded.season_code = "2024 ".into();

        let m = padded.into_season_match(&MatchValidator::new()).unwrap();
        assert_eq!(m.id(), "PL-2024-Arsenal-Chelsea-5");
        assert_eq!(m.competition_code(), "PL");
        assert_eq!(m.home_team(), "Arsenal");
    }
}
