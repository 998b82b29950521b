use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::db::game_store::{GameRef, GameStore};
use crate::game::{Game, GameError, Match, MatchValidator, PlayerData, ScoringPolicy};
use crate::models::game::*;
use crate::services::scoring_service::score_finished_match;

#[derive(Debug, ThisError)]
pub enum ServiceError {
    #[error("Game {0} not found")]
    GameNotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Orchestrates game operations on top of the store. Every operation on a
/// game runs while holding that game's lock.
#[derive(Debug)]
pub struct GameService {
    store: Arc<GameStore>,
    scorer: Arc<dyn ScoringPolicy>,
    validator: MatchValidator,
}

impl GameService {
    pub fn new(store: Arc<GameStore>, scorer: Arc<dyn ScoringPolicy>) -> Self {
        Self {
            store,
            scorer,
            validator: MatchValidator::new(),
        }
    }

    pub fn store(&self) -> &Arc<GameStore> {
        &self.store
    }

    async fn game(&self, game_id: Uuid) -> Result<GameRef, ServiceError> {
        self.store
            .get(game_id)
            .await
            .ok_or(ServiceError::GameNotFound(game_id))
    }

    pub async fn create_game(&self, request: CreateGameRequest) -> Result<GameView, ServiceError> {
        for (label, value) in [
            ("Game name", &request.name),
            ("Season code", &request.season_code),
            ("Competition code", &request.competition_code),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::Validation(format!("{} cannot be empty", label)));
            }
        }

        let game = Game::new(
            request.name.trim(),
            request.season_code.trim(),
            request.competition_code.trim(),
            self.scorer.clone(),
        );
        let view = GameView::from(&game);
        self.store.insert(game).await;

        tracing::info!(
            "Created game {} '{}' for {}/{}",
            view.id, view.name, view.competition_code, view.season_code
        );
        Ok(view)
    }

    pub async fn list_games(&self) -> Vec<GameView> {
        let mut views = Vec::new();
        for game_ref in self.store.all().await {
            views.push(GameView::from(&*game_ref.lock().await));
        }
        views.sort_by(|a, b| a.name.cmp(&b.name));
        views
    }

    pub async fn get_game(&self, game_id: Uuid) -> Result<GameView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let game = game_ref.lock().await;
        Ok(GameView::from(&*game))
    }

    pub async fn add_player(&self, game_id: Uuid, request: AddPlayerRequest) -> Result<PlayerData, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Player name cannot be empty".into()));
        }

        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        let player = PlayerData::new(name);
        game.add_player(player.clone())?;
        Ok(player)
    }

    pub async fn add_match(&self, game_id: Uuid, payload: MatchPayload) -> Result<MatchView, ServiceError> {
        let season_match = payload
            .into_season_match(&self.validator)
            .map_err(GameError::from)?;

        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        let handle = game.add_match(Box::new(season_match))?;
        let guard = handle.read();
        Ok(MatchView::from(&**guard))
    }

    pub async fn update_match(&self, game_id: Uuid, payload: MatchPayload) -> Result<MatchView, ServiceError> {
        let season_match = payload
            .into_season_match(&self.validator)
            .map_err(GameError::from)?;
        let view = MatchView::from(&season_match as &dyn Match);

        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        game.update_match(Box::new(season_match))?;
        Ok(view)
    }

    /// Feeds a refreshed fixture into every game tracking it. Returns the ids of
    /// the games that took the update; a game refusing it is logged and skipped.
    pub async fn ingest_match(&self, payload: MatchPayload) -> Result<Vec<Uuid>, ServiceError> {
        let season_match = payload
            .into_season_match(&self.validator)
            .map_err(GameError::from)?;
        let match_id = season_match.id();

        let mut updated = Vec::new();
        for game_ref in self.store.all().await {
            let mut game = game_ref.lock().await;
            if !game.has_match(&match_id) {
                continue;
            }
            match game.update_match(Box::new(season_match.clone())) {
                Ok(()) => updated.push(game.id()),
                Err(e) => {
                    tracing::warn!("Game {} refused update of match {}: {}", game.id(), match_id, e);
                }
            }
        }

        tracing::info!("Ingested match {} into {} games", match_id, updated.len());
        Ok(updated)
    }

    pub async fn start_match(&self, game_id: Uuid, match_id: &str) -> Result<MatchView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        game.start_match(match_id)?;
        self.match_view(&game, match_id)
    }

    pub async fn finish_match(
        &self,
        game_id: Uuid,
        match_id: &str,
        request: FinishMatchRequest,
    ) -> Result<MatchView, ServiceError> {
        self.validator
            .validate_goals(request.home_goals, request.away_goals)
            .map_err(GameError::from)?;

        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        game.finish_match(match_id, request.home_goals, request.away_goals)?;
        self.match_view(&game, match_id)
    }

    fn match_view(&self, game: &Game, match_id: &str) -> Result<MatchView, ServiceError> {
        let handle = game
            .match_handle(match_id)
            .ok_or_else(|| GameError::UnknownMatch(match_id.to_string()))?;
        let guard = handle.read();
        Ok(MatchView::from(&**guard))
    }

    pub async fn place_bet(
        &self,
        game_id: Uuid,
        request: PlaceBetRequest,
        now: DateTime<Utc>,
    ) -> Result<BetView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;

        let player = game
            .player(request.player_id)
            .ok_or(GameError::UnknownPlayer(request.player_id))?;
        let bet = game.bet_from_record(&request.record())?;
        game.add_player_bet(player.as_ref(), bet, now)?;

        let stored = game
            .match_result(&request.match_id)
            .and_then(|r| r.bet_for(request.player_id))
            .ok_or_else(|| GameError::UnknownMatch(request.match_id.clone()))?;
        Ok(BetView::from(stored))
    }

    pub async fn player_bets(&self, game_id: Uuid, player_id: Uuid) -> Result<Vec<BetView>, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let game = game_ref.lock().await;
        if !game.has_player(player_id) {
            return Err(GameError::UnknownPlayer(player_id).into());
        }
        Ok(game
            .bets_for_player(player_id)
            .into_iter()
            .map(BetView::from)
            .collect())
    }

    /// Computes and applies the scores of one finished match
    pub async fn score_match(&self, game_id: Uuid, match_id: &str) -> Result<MatchScoresView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        let scores = score_finished_match(&mut game, match_id)?;
        Ok(MatchScoresView::from(&scores))
    }

    pub async fn match_result(&self, game_id: Uuid, match_id: &str) -> Result<MatchResultView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let game = game_ref.lock().await;
        let result = game
            .match_result(match_id)
            .ok_or_else(|| GameError::UnknownMatch(match_id.to_string()))?;
        Ok(MatchResultView::from(result))
    }

    pub async fn leaderboard(&self, game_id: Uuid) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let game = game_ref.lock().await;
        Ok(LeaderboardEntry::standings(&game))
    }

    pub async fn finish_game(&self, game_id: Uuid) -> Result<WinnersView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let mut game = game_ref.lock().await;
        let unscored = game.matches_to_score();
        if !unscored.is_empty() {
            tracing::warn!(
                "Finishing game {} with {} finished matches not scored yet",
                game_id,
                unscored.len()
            );
        }
        game.finish()?;
        Ok(WinnersView::from(&*game))
    }

    pub async fn winners(&self, game_id: Uuid) -> Result<WinnersView, ServiceError> {
        let game_ref = self.game(game_id).await?;
        let game = game_ref.lock().await;
        Ok(WinnersView::from(&*game))
    }
}
