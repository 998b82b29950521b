use std::net::TcpListener;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};

use ligain_backend::config::settings::get_config;
use ligain_backend::db::game_store::GameStore;
use ligain_backend::game::OddsWeightedScorer;
use ligain_backend::run;
use ligain_backend::services::GameService;
use ligain_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<GameStore>,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let configuration = get_config().expect("Failed to read configuration.");
    let store = Arc::new(GameStore::new());
    let scorer = Arc::new(OddsWeightedScorer::new(configuration.scoring));
    let game_service = Arc::new(GameService::new(store.clone(), scorer));

    let server = run(listener, game_service).expect("Failed to bind address");
    let _ = tokio::spawn(server);
    TestApp { address, store }
}

pub fn kickoff_in(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

/// Creates a Premier League 2024 game and returns its id
pub async fn create_game(client: &Client, address: &str, name: &str) -> String {
    let response = client
        .post(&format!("{}/games", address))
        .json(&json!({
            "name": name,
            "season_code": "2024",
            "competition_code": "PL"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Cannot read response body.");
    body["data"]["id"].as_str().expect("Game id missing").to_string()
}

pub async fn add_player(client: &Client, address: &str, game_id: &str, name: &str) -> String {
    let response = client
        .post(&format!("{}/games/{}/players", address, game_id))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Cannot read response body.");
    body["data"]["id"].as_str().expect("Player id missing").to_string()
}

pub fn match_payload(home: &str, away: &str, date: DateTime<Utc>) -> Value {
    json!({
        "home_team": home,
        "away_team": away,
        "competition_code": "PL",
        "season_code": "2024",
        "matchday": 5,
        "date": date.to_rfc3339(),
        "home_team_odds": 1.8,
        "away_team_odds": 4.2,
        "draw_odds": 3.5
    })
}

/// Adds a fixture to the game and returns its match id
pub async fn add_match(client: &Client, address: &str, game_id: &str, payload: &Value) -> String {
    let response = client
        .post(&format!("{}/games/{}/matches", address, game_id))
        .json(payload)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Cannot read response body.");
    body["data"]["id"].as_str().expect("Match id missing").to_string()
}
