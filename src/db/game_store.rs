use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::game::Game;

/// One lock per game: every write to a game, and so every score application
/// on its matches, is serialized through it.
pub type GameRef = Arc<Mutex<Game>>;

/// In-memory repository of running games
#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<Uuid, GameRef>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, game: Game) -> GameRef {
        let id = game.id();
        let game_ref = Arc::new(Mutex::new(game));
        self.games.write().await.insert(id, game_ref.clone());
        game_ref
    }

    pub async fn get(&self, game_id: Uuid) -> Option<GameRef> {
        self.games.read().await.get(&game_id).cloned()
    }

    pub async fn all(&self) -> Vec<GameRef> {
        self.games.read().await.values().cloned().collect()
    }
}
