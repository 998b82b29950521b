use std::net::TcpListener;
use std::sync::Arc;

use ligain_backend::config::settings::get_config;
use ligain_backend::db::game_store::GameStore;
use ligain_backend::game::OddsWeightedScorer;
use ligain_backend::run;
use ligain_backend::services::{GameService, SchedulerService, ScoringService};
use ligain_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "ligain-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let store = Arc::new(GameStore::new());
    let scorer = Arc::new(OddsWeightedScorer::new(config.scoring.clone()));
    let game_service = Arc::new(GameService::new(store.clone(), scorer));

    // Kept alive for the lifetime of the server
    let _scheduler = if config.scheduler.enabled {
        let scheduler = match SchedulerService::new(ScoringService::new(store.clone())).await {
            Ok(scheduler) => scheduler,
            Err(e) => {
                tracing::error!("Failed to create scheduler service: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = scheduler.schedule_scoring(&config.scheduler.cron).await {
            tracing::error!("Failed to schedule scoring with cron '{}': {}", config.scheduler.cron, e);
            std::process::exit(1);
        }
        if let Err(e) = scheduler.start().await {
            tracing::error!("Failed to start scheduler: {}", e);
            std::process::exit(1);
        }
        Some(scheduler)
    } else {
        tracing::info!("Scoring scheduler disabled, matches are scored on demand only");
        None
    };

    let address = config.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(listener, game_service)?.await
}
