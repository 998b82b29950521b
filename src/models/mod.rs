pub mod common;
pub mod game;
