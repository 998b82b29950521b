pub mod game_service;
pub mod scheduler;
pub mod scoring_service;

pub use game_service::{GameService, ServiceError};
pub use scheduler::SchedulerService;
pub use scoring_service::{ScoringCycleResult, ScoringService};
