use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::errors::MatchError;

/// Returned by `get_winner` when neither side won
pub const DRAW: &str = "Draw";

/// Lifecycle of a fixture. Variants are ordered, a match only ever moves forward.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three-way result of a scoreline
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        match home_goals.cmp(&away_goals) {
            Ordering::Greater => Outcome::HomeWin,
            Ordering::Less => Outcome::AwayWin,
            Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Separates the parts of a match id
const ID_SEPARATOR: char = '-';
/// Prefixes a literal separator or escape character inside a part
const ID_ESCAPE: char = '~';

fn push_id_part(id: &mut String, part: &str) {
    for c in part.chars() {
        if c == ID_SEPARATOR || c == ID_ESCAPE {
            id.push(ID_ESCAPE);
        }
        id.push(c);
    }
}

/// Deterministic identity of a fixture, stable across re-imports.
///
/// Parts are joined with `-`. A `-` or `~` inside a part is prefixed with `~`,
/// so distinct fixtures never share an id.
pub fn match_id(
    competition_code: &str,
    season_code: &str,
    home_team: &str,
    away_team: &str,
    matchday: u32,
) -> String {
    let mut id = String::new();
    for part in [competition_code, season_code, home_team, away_team] {
        push_id_part(&mut id, part);
        id.push(ID_SEPARATOR);
    }
    id.push_str(&matchday.to_string());
    id
}

/// Capability surface every fixture variant exposes.
///
/// Goals read as 0 until the match is finished, so anything score dependent
/// has to be gated on [`Match::is_finished`] first.
pub trait Match: fmt::Debug + Send + Sync {
    fn home_team(&self) -> &str;
    fn away_team(&self) -> &str;
    fn home_goals(&self) -> u32;
    fn away_goals(&self) -> u32;
    /// 0.0 means unknown
    fn home_team_odds(&self) -> f64;
    fn away_team_odds(&self) -> f64;
    fn draw_odds(&self) -> f64;
    fn status(&self) -> MatchStatus;
    fn season_code(&self) -> &str;
    fn competition_code(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;
    fn matchday(&self) -> u32;

    /// Scheduled -> InProgress
    fn start(&mut self) -> Result<(), MatchError>;

    /// Records the final score. Rejected once the match is finished.
    fn finish(&mut self, home_goals: u32, away_goals: u32) -> Result<(), MatchError>;

    fn clone_box(&self) -> Box<dyn Match>;

    fn id(&self) -> String {
        match_id(
            self.competition_code(),
            self.season_code(),
            self.home_team(),
            self.away_team(),
            self.matchday(),
        )
    }

    fn is_finished(&self) -> bool {
        self.status() == MatchStatus::Finished
    }

    fn is_in_progress(&self) -> bool {
        self.status() == MatchStatus::InProgress
    }

    fn outcome(&self) -> Outcome {
        Outcome::from_goals(self.home_goals(), self.away_goals())
    }

    /// Winning team name, or [`DRAW`]
    fn get_winner(&self) -> String {
        match self.outcome() {
            Outcome::HomeWin => self.home_team().to_string(),
            Outcome::AwayWin => self.away_team().to_string(),
            Outcome::Draw => DRAW.to_string(),
        }
    }

    fn absolute_goal_difference(&self) -> u32 {
        self.home_goals().abs_diff(self.away_goals())
    }

    fn is_draw(&self) -> bool {
        self.home_goals() == self.away_goals()
    }

    fn total_goals(&self) -> u32 {
        self.home_goals().saturating_add(self.away_goals())
    }

    /// 0.0 when either side's odds are unknown
    fn absolute_difference_odds_between_home_and_away(&self) -> f64 {
        let (home, away) = (self.home_team_odds(), self.away_team_odds());
        if home <= 0.0 || away <= 0.0 {
            return 0.0;
        }
        (home - away).abs()
    }
}

impl Clone for Box<dyn Match> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

fn validate_odds(odds: f64, side: &str) -> Result<f64, MatchError> {
    if !odds.is_finite() || odds < 0.0 {
        return Err(MatchError::InvalidOdds(format!(
            "{} odds must be positive or 0 for unknown, got {}",
            side, odds
        )));
    }
    Ok(odds)
}

/// A fixture of a real competition season, as imported from the match feed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeasonMatch {
    home_team: String,
    away_team: String,
    home_goals: u32,
    away_goals: u32,
    home_team_odds: f64,
    away_team_odds: f64,
    draw_odds: f64,
    status: MatchStatus,
    season_code: String,
    competition_code: String,
    date: DateTime<Utc>,
    matchday: u32,
}

impl SeasonMatch {
    /// New scheduled fixture without goals or odds
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        season_code: impl Into<String>,
        competition_code: impl Into<String>,
        date: DateTime<Utc>,
        matchday: u32,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals: 0,
            away_goals: 0,
            home_team_odds: 0.0,
            away_team_odds: 0.0,
            draw_odds: 0.0,
            status: MatchStatus::Scheduled,
            season_code: season_code.into(),
            competition_code: competition_code.into(),
            date,
            matchday,
        }
    }

    pub fn with_odds(mut self, home: f64, away: f64, draw: f64) -> Result<Self, MatchError> {
        self.home_team_odds = validate_odds(home, "Home")?;
        self.away_team_odds = validate_odds(away, "Away")?;
        self.draw_odds = validate_odds(draw, "Draw")?;
        Ok(self)
    }

    /// Used when the feed delivers a match that is already live or over
    pub fn with_state(mut self, status: MatchStatus, home_goals: u32, away_goals: u32) -> Self {
        self.status = status;
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self
    }
}

impl Match for SeasonMatch {
    fn home_team(&self) -> &str {
        &self.home_team
    }

    fn away_team(&self) -> &str {
        &self.away_team
    }

    fn home_goals(&self) -> u32 {
        self.home_goals
    }

    fn away_goals(&self) -> u32 {
        self.away_goals
    }

    fn home_team_odds(&self) -> f64 {
        self.home_team_odds
    }

    fn away_team_odds(&self) -> f64 {
        self.away_team_odds
    }

    fn draw_odds(&self) -> f64 {
        self.draw_odds
    }

    fn status(&self) -> MatchStatus {
        self.status
    }

    fn season_code(&self) -> &str {
        &self.season_code
    }

    fn competition_code(&self) -> &str {
        &self.competition_code
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn matchday(&self) -> u32 {
        self.matchday
    }

    fn start(&mut self) -> Result<(), MatchError> {
        if self.status != MatchStatus::Scheduled {
            return Err(MatchError::InvalidTransition {
                from: self.status,
                to: MatchStatus::InProgress,
            });
        }
        self.status = MatchStatus::InProgress;
        Ok(())
    }

    fn finish(&mut self, home_goals: u32, away_goals: u32) -> Result<(), MatchError> {
        if self.status == MatchStatus::Finished {
            return Err(MatchError::AlreadyFinished(self.id()));
        }
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.status = MatchStatus::Finished;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Match> {
        Box::new(self.clone())
    }
}

/// Lightweight fixture with canned competition data, for tests and demos
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StaticMatch {
    home_team: String,
    away_team: String,
    home_goals: u32,
    away_goals: u32,
    home_team_odds: f64,
    away_team_odds: f64,
    draw_odds: f64,
    status: MatchStatus,
    date: DateTime<Utc>,
}

impl StaticMatch {
    pub const COMPETITION_CODE: &'static str = "TEST";
    pub const SEASON_CODE: &'static str = "TEST";
    pub const MATCHDAY: u32 = 1;

    pub fn scheduled(home_team: impl Into<String>, away_team: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals: 0,
            away_goals: 0,
            home_team_odds: 0.0,
            away_team_odds: 0.0,
            draw_odds: 0.0,
            status: MatchStatus::Scheduled,
            date,
        }
    }

    pub fn finished(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        let mut canned = Self::scheduled(home_team, away_team, DateTime::<Utc>::default());
        canned.home_goals = home_goals;
        canned.away_goals = away_goals;
        canned.status = MatchStatus::Finished;
        canned
    }

    /// Negative odds are stored as unknown
    pub fn with_odds(mut self, home: f64, away: f64, draw: f64) -> Self {
        self.home_team_odds = home.max(0.0);
        self.away_team_odds = away.max(0.0);
        self.draw_odds = draw.max(0.0);
        self
    }
}

impl Match for StaticMatch {
    fn home_team(&self) -> &str {
        &self.home_team
    }

    fn away_team(&self) -> &str {
        &self.away_team
    }

    fn home_goals(&self) -> u32 {
        self.home_goals
    }

    fn away_goals(&self) -> u32 {
        self.away_goals
    }

    fn home_team_odds(&self) -> f64 {
        self.home_team_odds
    }

    fn away_team_odds(&self) -> f64 {
        self.away_team_odds
    }

    fn draw_odds(&self) -> f64 {
        self.draw_odds
    }

    fn status(&self) -> MatchStatus {
        self.status
    }

    fn season_code(&self) -> &str {
        Self::SEASON_CODE
    }

    fn competition_code(&self) -> &str {
        Self::COMPETITION_CODE
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn matchday(&self) -> u32 {
        Self::MATCHDAY
    }

    fn start(&mut self) -> Result<(), MatchError> {
        if self.status != MatchStatus::Scheduled {
            return Err(MatchError::InvalidTransition {
                from: self.status,
                to: MatchStatus::InProgress,
            });
        }
        self.status = MatchStatus::InProgress;
        Ok(())
    }

    fn finish(&mut self, home_goals: u32, away_goals: u32) -> Result<(), MatchError> {
        if self.status == MatchStatus::Finished {
            return Err(MatchError::AlreadyFinished(self.id()));
        }
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.status = MatchStatus::Finished;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Match> {
        Box::new(self.clone())
    }
}

/// Shared handle to one fixture. Every bet on the match holds a clone, so a
/// transition made through any handle is seen by all of them.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    inner: Arc<RwLock<Box<dyn Match>>>,
}

impl MatchHandle {
    pub fn new<M: Match + 'static>(m: M) -> Self {
        Self::from_boxed(Box::new(m))
    }

    pub fn from_boxed(m: Box<dyn Match>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(m)),
        }
    }

    /// A panic while holding the lock cannot leave a fixture half-written, so a
    /// poisoned lock is simply recovered.
    pub fn read(&self) -> RwLockReadGuard<'_, Box<dyn Match>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Box<dyn Match>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> String {
        self.read().id()
    }

    /// Owned copy of the current state, detached from the handle
    pub fn snapshot(&self) -> Box<dyn Match> {
        self.read().clone_box()
    }

    pub fn start(&self) -> Result<(), MatchError> {
        let mut m = self.write();
        m.start().map_err(|e| {
            tracing::warn!("Rejected start of match {}: {}", m.id(), e);
            e
        })
    }

    pub fn finish(&self, home_goals: u32, away_goals: u32) -> Result<(), MatchError> {
        let mut m = self.write();
        m.finish(home_goals, away_goals).map_err(|e| {
            tracing::warn!("Rejected finish of match {}: {}", m.id(), e);
            e
        })
    }

    pub(crate) fn replace(&self, m: Box<dyn Match>) {
        *self.write() = m;
    }

    pub fn shares_match_with(&self, other: &MatchHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
