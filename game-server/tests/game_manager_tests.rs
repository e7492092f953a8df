
use chrono::{Duration, Local};
use game_types::{GameId, GameOverState, GuessRejection, LetterStatus};
use test_helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_start_creates_and_resumes_game() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    let first = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert!(first.game_id.is_some());
    assert_eq!(session, first.game_id);
    assert!(first.prior_guesses.is_empty());
    assert_eq!(first.guesses_remaining, 5);
    assert!(first.game_over.is_none());

    let second = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert_eq!(second.game_id, first.game_id);
    assert_eq!(setup.games.games_for_user(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_win_on_fourth_guess() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    manager.start_or_resume(&alice, &mut session).await.unwrap();
    let game_id = session.unwrap();

    let outcome =
        play_guesses(&manager, &alice, &mut session, &["BRAVE", "TRAIN", "PLANE", "CRANE"]).await;
    assert!(outcome.game_over);
    assert_eq!(outcome.won, Some(true));
    assert_eq!(outcome.revealed_word.as_deref(), Some("CRANE"));
    assert_eq!(outcome.guesses_remaining, Some(0));
    assert!(
        outcome
            .letters
            .unwrap()
            .iter()
            .all(|letter| letter.status == LetterStatus::Correct)
    );
    assert_eq!(session, None);

    // A finished game cannot be resumed, even if a stale binding points at it
    session = Some(game_id);
    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert_ne!(snapshot.game_id, Some(game_id));
    assert_eq!(setup.games.count_guesses(game_id).await.unwrap(), 4);
    assert!(setup.games.find_by_id(game_id).await.unwrap().unwrap().win);
}

#[tokio::test]
async fn test_five_wrong_guesses_lose() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    let outcome = play_guesses(
        &manager,
        &alice,
        &mut session,
        &["BRAVE", "TRAIN", "PLANE", "GRAND", "SLATE"],
    )
    .await;

    assert!(outcome.game_over);
    assert_eq!(outcome.won, Some(false));
    assert_eq!(outcome.revealed_word.as_deref(), Some("CRANE"));
    assert_eq!(session, None);
    assert_eq!(
        manager
            .limiter()
            .completed_games_today(alice.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_continuing_guess_reports_remaining() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    let outcome = manager
        .submit_guess(&alice, &mut session, "brave")
        .await
        .unwrap();
    assert!(outcome.accepted);
    assert!(!outcome.game_over);
    assert_eq!(outcome.won, Some(false));
    assert_eq!(outcome.revealed_word, None);
    assert_eq!(outcome.guesses_remaining, Some(4));
    assert!(session.is_some());
}

#[tokio::test]
async fn test_invalid_guesses_change_nothing() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    let outcome = manager
        .submit_guess(&alice, &mut session, "CAT")
        .await
        .unwrap();
    assert!(!outcome.accepted);
    assert!(!outcome.game_over);
    assert_eq!(outcome.error_reason, Some(GuessRejection::BadLength));

    let outcome = manager
        .submit_guess(&alice, &mut session, "CR4NE")
        .await
        .unwrap();
    assert_eq!(outcome.error_reason, Some(GuessRejection::BadCharacters));

    assert_eq!(session, None);
    assert!(setup.games.games_for_user(alice.id).await.unwrap().is_empty());

    // Rejected guesses inside a game do not consume attempts
    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    let game_id = snapshot.game_id.unwrap();
    manager
        .submit_guess(&alice, &mut session, "CRANES")
        .await
        .unwrap();
    assert_eq!(setup.games.count_guesses(game_id).await.unwrap(), 0);
    assert_eq!(session, Some(game_id));
}

#[tokio::test]
async fn test_daily_limit_blocks_fourth_game() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    for _ in 0..3 {
        win_game(&manager, &alice, &mut session, "CRANE").await;
    }

    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert_eq!(snapshot.game_id, None);
    assert_eq!(
        snapshot.game_over,
        Some(GameOverState::DailyLimitReached { completed_today: 3 })
    );

    let outcome = manager
        .submit_guess(&alice, &mut session, "CRANE")
        .await
        .unwrap();
    assert!(!outcome.accepted);
    assert!(outcome.game_over);
    assert_eq!(outcome.error_reason, Some(GuessRejection::LimitReached));
    assert_eq!(setup.games.games_for_user(alice.id).await.unwrap().len(), 3);

    // Other players keep their own allowance
    let bobby = setup.create_user("bobby").await;
    let mut other_session: Option<GameId> = None;
    let snapshot = manager
        .start_or_resume(&bobby, &mut other_session)
        .await
        .unwrap();
    assert!(snapshot.game_over.is_none());
}

#[tokio::test]
async fn test_daily_limit_resets_next_day() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    for _ in 0..3 {
        win_game(&manager, &alice, &mut session, "CRANE").await;
    }

    let tomorrow = setup.game_manager_at(Local::now() + Duration::days(1));
    let snapshot = tomorrow.start_or_resume(&alice, &mut session).await.unwrap();
    assert!(snapshot.game_id.is_some());
    assert!(snapshot.game_over.is_none());
}

#[tokio::test]
async fn test_in_progress_game_does_not_count() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    play_guesses(&manager, &alice, &mut session, &["BRAVE", "TRAIN"]).await;
    let limiter = manager.limiter();
    assert_eq!(limiter.completed_games_today(alice.id).await.unwrap(), 0);
    assert!(limiter.can_start_or_continue(alice.id).await.unwrap());
}

#[tokio::test]
async fn test_foreign_or_missing_binding_is_replaced() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let bobby = setup.create_user("bobby").await;

    let mut bobby_session: Option<GameId> = None;
    let bobby_game = manager
        .start_or_resume(&bobby, &mut bobby_session)
        .await
        .unwrap()
        .game_id
        .unwrap();

    let mut session = Some(bobby_game);
    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    let alice_game = snapshot.game_id.unwrap();
    assert_ne!(alice_game, bobby_game);
    assert_eq!(session, Some(alice_game));

    let mut session = Some(Uuid::new_v4());
    let outcome = manager
        .submit_guess(&alice, &mut session, "BRAVE")
        .await
        .unwrap();
    assert!(outcome.accepted);
    assert_eq!(setup.games.count_guesses(bobby_game).await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_word_bank() {
    let setup = TestGameServerSetup::new(&[]).await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert_eq!(snapshot.game_over, Some(GameOverState::NoWordsAvailable));
    assert_eq!(snapshot.game_id, None);

    let outcome = manager
        .submit_guess(&alice, &mut session, "CRANE")
        .await
        .unwrap();
    assert!(!outcome.accepted);
    assert!(outcome.game_over);
    assert_eq!(outcome.error_reason, Some(GuessRejection::NoWords));
    assert_eq!(session, None);
}

#[tokio::test]
async fn test_snapshot_recomputes_colors_without_target() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;
    let mut session: Option<GameId> = None;

    play_guesses(&manager, &alice, &mut session, &["BRAVE"]).await;

    let snapshot = manager.start_or_resume(&alice, &mut session).await.unwrap();
    assert_eq!(snapshot.guesses_remaining, 4);
    assert_eq!(snapshot.prior_guesses.len(), 1);

    let row = &snapshot.prior_guesses[0];
    assert_eq!(row.word, "BRAVE");
    assert!(!row.is_correct);
    let statuses: Vec<LetterStatus> = row.letters.iter().map(|letter| letter.status).collect();
    assert_eq!(
        statuses,
        vec![
            LetterStatus::Absent,
            LetterStatus::Correct,
            LetterStatus::Correct,
            LetterStatus::Absent,
            LetterStatus::Correct,
        ]
    );

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(!json.contains("CRANE"));
}
