
use std::sync::Arc;
use std::time::Duration;

use game_core::SessionBinding;
use game_server::auth::AuthError;
use game_server::session::SessionStore;
use test_helpers::*;

#[tokio::test]
async fn test_register_and_login_round_trip() {
    let setup = TestGameServerSetup::with_target("CRANE").await;

    let registered = setup
        .auth_service
        .register("alice", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(registered.username, "alice");
    assert!(!registered.is_admin);

    let logged_in = setup
        .auth_service
        .login("alice", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(logged_in.id, registered.id);

    let (_, stored_hash) = setup
        .users
        .find_credentials("alice")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored_hash, TEST_PASSWORD);
}

#[tokio::test]
async fn test_admin_flag_comes_from_configuration() {
    let setup = TestGameServerSetup::with_target("CRANE").await;

    let admin = setup.create_user("adminuser").await;
    let player = setup.create_user("player").await;

    assert!(admin.is_admin);
    assert!(!player.is_admin);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let setup = TestGameServerSetup::with_target("CRANE").await;

    assert!(matches!(
        setup.auth_service.register("bob", TEST_PASSWORD).await,
        Err(AuthError::InvalidUsername)
    ));
    assert!(matches!(
        setup.auth_service.register("alice42", TEST_PASSWORD).await,
        Err(AuthError::InvalidUsername)
    ));
    assert!(matches!(
        setup.auth_service.register("alice", "password").await,
        Err(AuthError::InvalidPassword)
    ));
    assert!(setup.users.find_by_username("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    setup.create_user("alice").await;

    assert!(matches!(
        setup.auth_service.register("alice", TEST_PASSWORD).await,
        Err(AuthError::UsernameTaken)
    ));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    setup.create_user("alice").await;

    assert!(matches!(
        setup.auth_service.login("alice", "Wrong9@").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        setup.auth_service.login("nobody", TEST_PASSWORD).await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_session_binding_carries_current_game() {
    let setup = TestGameServerSetup::with_target("CRANE").await;
    let manager = setup.game_manager();
    let alice = setup.create_user("alice").await;

    let sessions = Arc::new(SessionStore::new(Duration::from_secs(3600)));
    let token = sessions.create_session(alice.clone());
    assert_eq!(sessions.authenticate(&token), Some(alice.clone()));

    let mut binding = sessions.binding(&token);
    let snapshot = manager.start_or_resume(&alice, &mut binding).await.unwrap();
    assert_eq!(binding.current_game(), snapshot.game_id);

    // A fresh handle on the same token sees the same game
    let mut again = sessions.binding(&token);
    let resumed = manager.start_or_resume(&alice, &mut again).await.unwrap();
    assert_eq!(resumed.game_id, snapshot.game_id);

    assert!(sessions.remove_session(&token));
    assert_eq!(sessions.authenticate(&token), None);
}
