pub mod game_store;
