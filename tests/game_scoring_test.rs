use std::sync::Arc;

use chrono::{Duration, Utc};

use ligain_backend::game::validation::MAX_REASONABLE_GOALS;
use ligain_backend::game::{
    Bet, Game, GameError, Match, MatchError, OddsWeightedScorer, PlayerData, ScoringPolicy, StaticMatch,
};

fn new_game(name: &str) -> Game {
    Game::new(
        name,
        StaticMatch::SEASON_CODE,
        StaticMatch::COMPETITION_CODE,
        Arc::new(OddsWeightedScorer::default()),
    )
}

#[test]
fn both_correct_bets_are_credited_exactly_once() {
    let mut game = new_game("Pool");
    let now = Utc::now();
    let player1 = game.add_player(PlayerData::new("Player1")).unwrap();
    let player2 = game.add_player(PlayerData::new("Player2")).unwrap();
    let match_id = game
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(3))))
        .unwrap()
        .id();

    game.add_player_bet(player1.as_ref(), game.new_bet(&match_id, 0, 2).unwrap(), now)
        .unwrap();
    game.add_player_bet(player2.as_ref(), game.new_bet(&match_id, 0, 3).unwrap(), now)
        .unwrap();
    game.finish_match(&match_id, 0, 5).unwrap();

    let result = game.match_result(&match_id).unwrap();
    assert!(result.bet_for(player1.id()).unwrap().is_bet_correct());
    assert!(result.bet_for(player2.id()).unwrap().is_bet_correct());

    let before = game.get_players_points();
    let scores = game.calculate_match_scores(&match_id).unwrap();
    let score1 = scores.score_for(player1.id()).unwrap();
    let score2 = scores.score_for(player2.id()).unwrap();
    assert!(score1 > 0 && score2 > 0);

    game.apply_match_scores(scores.clone()).unwrap();
    let after = game.get_players_points();
    assert_eq!(after[&player1.id()], before[&player1.id()] + score1);
    assert_eq!(after[&player2.id()], before[&player2.id()] + score2);

    // a second application of the same scores changes nothing
    assert_eq!(
        game.apply_match_scores(scores),
        Err(GameError::ScoresAlreadyApplied(match_id.clone()))
    );
    assert!(matches!(
        game.calculate_match_scores(&match_id),
        Err(GameError::ScoresAlreadyApplied(_))
    ));
    assert_eq!(game.get_players_points(), after);
    assert_eq!(game.get_players_points(), game.get_players_points());
}

#[test]
fn games_holding_the_same_fixture_share_no_state() {
    let now = Utc::now();
    let kickoff = now + Duration::hours(1);
    let mut game_a = new_game("A");
    let mut game_b = new_game("B");
    let alice = game_a.add_player(PlayerData::with_id(uuid::Uuid::new_v4(), "Alice")).unwrap();
    game_b
        .add_player(PlayerData::with_id(alice.id(), "Alice"))
        .unwrap();

    let handle_a = game_a
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", kickoff)))
        .unwrap();
    let handle_b = game_b
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", kickoff)))
        .unwrap();
    assert_eq!(handle_a.id(), handle_b.id());
    assert!(!handle_a.shares_match_with(&handle_b));

    // a bet built against game A is stored against game B's own fixture
    let bet = game_a.new_bet(&handle_a.id(), 2, 0).unwrap();
    game_a.add_player_bet(alice.as_ref(), bet.clone(), now).unwrap();
    game_b.add_player_bet(alice.as_ref(), bet, now).unwrap();
    let stored_in_b = game_b.bets_for_player(alice.id())[0];
    assert!(stored_in_b.fixture().shares_match_with(&handle_b));

    game_a.finish_match(&handle_a.id(), 2, 0).unwrap();
    let scores = game_a.calculate_match_scores(&handle_a.id()).unwrap();
    game_a.apply_match_scores(scores).unwrap();

    assert!(game_a.get_players_points()[&alice.id()] > 0);
    assert_eq!(game_b.get_players_points()[&alice.id()], 0);
    assert!(!handle_b.read().is_finished());
    assert!(matches!(
        game_b.calculate_match_scores(&handle_b.id()),
        Err(GameError::MatchNotFinished(_))
    ));
}

#[test]
fn scores_only_apply_to_the_game_that_computed_them() {
    let now = Utc::now();
    let kickoff = now + Duration::hours(1);
    let mut game_a = new_game("A");
    let mut game_b = new_game("B");
    let alice = game_a.add_player(PlayerData::with_id(uuid::Uuid::new_v4(), "Alice")).unwrap();
    game_b
        .add_player(PlayerData::with_id(alice.id(), "Alice"))
        .unwrap();

    let match_id = game_a
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", kickoff)))
        .unwrap()
        .id();
    game_b
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", kickoff)))
        .unwrap();
    for game in [&mut game_a, &mut game_b] {
        let bet = game.new_bet(&match_id, 2, 0).unwrap();
        game.add_player_bet(alice.as_ref(), bet, now).unwrap();
        game.finish_match(&match_id, 2, 0).unwrap();
    }

    let scores = game_a.calculate_match_scores(&match_id).unwrap();
    assert_eq!(scores.game_id(), game_a.id());
    assert!(matches!(
        game_b.apply_match_scores(scores.clone()),
        Err(GameError::ScoresFromAnotherGame { .. })
    ));
    assert_eq!(game_b.get_players_points()[&alice.id()], 0);
    assert!(!game_b.match_result(&match_id).unwrap().is_scored());

    // game B still scores the match with its own scores
    game_a.apply_match_scores(scores).unwrap();
    let own = game_b.calculate_match_scores(&match_id).unwrap();
    game_b.apply_match_scores(own).unwrap();
    assert_eq!(
        game_b.get_players_points()[&alice.id()],
        game_a.get_players_points()[&alice.id()]
    );
}

#[test]
fn out_of_range_predictions_are_rejected() {
    let now = Utc::now();
    let mut game = new_game("Bounds");
    let player = game.add_player(PlayerData::new("Eve")).unwrap();
    let match_id = game
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(1))))
        .unwrap()
        .id();

    for (home, away) in [(u32::MAX, 1), (1, MAX_REASONABLE_GOALS + 1)] {
        let bet = game.new_bet(&match_id, home, away).unwrap();
        assert!(matches!(
            game.add_player_bet(player.as_ref(), bet, now),
            Err(GameError::Match(MatchError::Invalid(_)))
        ));
    }
    assert!(game.bets_for_player(player.id()).is_empty());

    let bet = game.new_bet(&match_id, MAX_REASONABLE_GOALS, 0).unwrap();
    game.add_player_bet(player.as_ref(), bet, now).unwrap();

    game.finish_match(&match_id, 3, 0).unwrap();
    let scores = game.calculate_match_scores(&match_id).unwrap();
    assert!(scores.score_for(player.id()).unwrap() > 0);
    game.apply_match_scores(scores).unwrap();
}

#[test]
fn unknown_players_and_matches_are_rejected() {
    let now = Utc::now();
    let mut game = new_game("Strict");
    let outsider = PlayerData::new("Outsider");
    let match_id = game
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(1))))
        .unwrap()
        .id();

    let bet = game.new_bet(&match_id, 1, 1).unwrap();
    assert_eq!(
        game.check_player_bet_validity(&outsider, &bet, now),
        Err(GameError::UnknownPlayer(outsider.id))
    );
    assert!(matches!(
        game.new_bet("TEST-TEST-Nobody-Else-1", 1, 0),
        Err(GameError::UnknownMatch(_))
    ));
    assert!(matches!(
        game.calculate_match_scores("TEST-TEST-Nobody-Else-1"),
        Err(GameError::UnknownMatch(_))
    ));
}

#[test]
fn replacing_a_bet_keeps_one_bet_per_player() {
    let now = Utc::now();
    let mut game = new_game("Changes");
    let player = game.add_player(PlayerData::new("Dana")).unwrap();
    let match_id = game
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(1))))
        .unwrap()
        .id();

    game.add_player_bet(player.as_ref(), game.new_bet(&match_id, 1, 0).unwrap(), now)
        .unwrap();
    game.add_player_bet(player.as_ref(), game.new_bet(&match_id, 0, 2).unwrap(), now)
        .unwrap();

    let bets = game.bets_for_player(player.id());
    assert_eq!(bets.len(), 1);
    assert_eq!(bets[0].predicted_away_goals(), 2);
    assert_eq!(game.match_result(&match_id).unwrap().bets().len(), 1);
}

#[derive(Debug)]
struct ThreeOneZero;

impl ScoringPolicy for ThreeOneZero {
    fn compute_score(&self, bet: &Bet, _m: &dyn Match) -> i32 {
        if bet.is_bet_perfect() {
            3
        } else if bet.is_bet_correct() {
            1
        } else {
            0
        }
    }
}

#[test]
fn scoring_policy_is_pluggable() {
    let now = Utc::now();
    let mut game = Game::new(
        "Classic",
        StaticMatch::SEASON_CODE,
        StaticMatch::COMPETITION_CODE,
        Arc::new(ThreeOneZero),
    );
    let exact = game.add_player(PlayerData::new("Exact")).unwrap();
    let close = game.add_player(PlayerData::new("Close")).unwrap();
    let wrong = game.add_player(PlayerData::new("Wrong")).unwrap();
    let match_id = game
        .add_match(Box::new(StaticMatch::scheduled("Home", "Away", now + Duration::hours(1))))
        .unwrap()
        .id();

    for (player, predicted) in [(&exact, (2, 1)), (&close, (1, 0)), (&wrong, (0, 0))] {
        let bet = game.new_bet(&match_id, predicted.0, predicted.1).unwrap();
        game.add_player_bet(player.as_ref(), bet, now).unwrap();
    }
    game.finish_match(&match_id, 2, 1).unwrap();
    let scores = game.calculate_match_scores(&match_id).unwrap();
    game.apply_match_scores(scores).unwrap();

    let points = game.get_players_points();
    assert_eq!(points[&exact.id()], 3);
    assert_eq!(points[&close.id()], 1);
    assert_eq!(points[&wrong.id()], 0);

    game.finish().unwrap();
    let winners = game.get_winner();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].name(), "Exact");
}
