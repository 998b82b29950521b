use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait Player: fmt::Debug + Send + Sync {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerData {
    pub id: Uuid,
    pub name: String,
}

impl PlayerData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Player for PlayerData {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
