use gcommon::SessionId;
use ggame::{
    ChatMessage, CredentialStore, GameSession, GameStore, GuardKind, StoreErrorKind,
};
use gprovider::{ProviderId, TurnRole};
use gstore::SqliteGameStore;

fn open_store() -> SqliteGameStore {
    SqliteGameStore::new_in_memory().expect("in-memory store should open")
}

#[tokio::test]
async fn sessions_round_trip_with_all_fields() {
    let store = open_store();
    let session = GameSession::new(GuardKind::TruthTeller);
    let session_id = session.id.clone();

    store
        .insert_session(session.clone())
        .await
        .expect("insert should succeed");

    let loaded = store
        .load_session(&session_id)
        .await
        .expect("load should succeed");
    assert_eq!(loaded.id, session_id);
    assert_eq!(loaded.guard, GuardKind::TruthTeller);
    assert!(loaded.player_guess.is_none());
    assert!(loaded.is_correct.is_none());
    assert!(loaded.ended_at.is_none());
}

#[tokio::test]
async fn loading_an_unknown_session_is_not_found() {
    let store = open_store();
    let missing = SessionId::new("missing");

    let error = store
        .load_session(&missing)
        .await
        .expect_err("unknown session must fail");
    assert_eq!(error.kind, StoreErrorKind::NotFound);
}

#[tokio::test]
async fn completing_a_session_seals_the_stored_outcome() {
    let store = open_store();
    let mut session = GameSession::new(GuardKind::Liar);
    let session_id = session.id.clone();
    store
        .insert_session(session.clone())
        .await
        .expect("insert should succeed");

    let outcome = session.complete(GuardKind::TruthTeller);
    store
        .complete_session(&session_id, outcome)
        .await
        .expect("completion should persist");

    let loaded = store
        .load_session(&session_id)
        .await
        .expect("load should succeed");
    assert_eq!(loaded.player_guess, Some(GuardKind::TruthTeller));
    assert_eq!(loaded.is_correct, Some(false));
    assert!(loaded.is_complete());
}

#[tokio::test]
async fn completing_an_unknown_session_is_not_found() {
    let store = open_store();
    let mut orphan = GameSession::new(GuardKind::Liar);
    let orphan_id = orphan.id.clone();
    let outcome = orphan.complete(GuardKind::Liar);

    let error = store
        .complete_session(&orphan_id, outcome)
        .await
        .expect_err("unknown session must fail");
    assert_eq!(error.kind, StoreErrorKind::NotFound);
}

#[tokio::test]
async fn transcripts_come_back_in_append_order() {
    let store = open_store();
    let session = GameSession::new(GuardKind::Liar);
    let session_id = session.id.clone();
    store
        .insert_session(session)
        .await
        .expect("insert should succeed");

    let turns = [
        (TurnRole::User, "Are you the liar?"),
        (TurnRole::Assistant, "No."),
        (TurnRole::User, "Would the other guard say you lie?"),
        (TurnRole::Assistant, "Never."),
    ];
    for (role, content) in turns {
        store
            .append_message(ChatMessage::new(session_id.clone(), role, content))
            .await
            .expect("append should succeed");
    }

    let messages = store
        .load_messages(&session_id)
        .await
        .expect("load should succeed");
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "Are you the liar?",
            "No.",
            "Would the other guard say you lie?",
            "Never."
        ]
    );
    assert_eq!(messages[0].role, TurnRole::User);
    assert_eq!(messages[1].role, TurnRole::Assistant);
}

#[tokio::test]
async fn deleting_a_session_cascades_to_its_messages() {
    let store = open_store();
    let session = GameSession::new(GuardKind::TruthTeller);
    let session_id = session.id.clone();
    store
        .insert_session(session)
        .await
        .expect("insert should succeed");
    store
        .append_message(ChatMessage::new(session_id.clone(), TurnRole::User, "hi"))
        .await
        .expect("append should succeed");

    store
        .delete_session(&session_id)
        .await
        .expect("delete should succeed");

    let messages = store
        .load_messages(&session_id)
        .await
        .expect("load should succeed");
    assert!(messages.is_empty());

    let error = store
        .load_session(&session_id)
        .await
        .expect_err("session should be gone");
    assert_eq!(error.kind, StoreErrorKind::NotFound);
}

#[tokio::test]
async fn credentials_upsert_per_provider() {
    let store = open_store();

    store
        .save_credential(ProviderId::OpenAi, "sk-first")
        .await
        .expect("save should succeed");
    store
        .save_credential(ProviderId::Anthropic, "sk-ant")
        .await
        .expect("save should succeed");
    store
        .save_credential(ProviderId::OpenAi, "sk-second")
        .await
        .expect("overwrite should succeed");

    let openai = store
        .load_credential(ProviderId::OpenAi)
        .await
        .expect("load should succeed");
    assert_eq!(openai.as_deref(), Some("sk-second"));

    let anthropic = store
        .load_credential(ProviderId::Anthropic)
        .await
        .expect("load should succeed");
    assert_eq!(anthropic.as_deref(), Some("sk-ant"));

    let listed = store
        .list_credentials()
        .await
        .expect("list should succeed");
    assert_eq!(listed, vec![ProviderId::OpenAi, ProviderId::Anthropic]);

    store
        .delete_credential(ProviderId::OpenAi)
        .await
        .expect("delete should succeed");
    let removed = store
        .load_credential(ProviderId::OpenAi)
        .await
        .expect("load should succeed");
    assert!(removed.is_none());

    let listed = store
        .list_credentials()
        .await
        .expect("list should succeed");
    assert_eq!(listed, vec![ProviderId::Anthropic]);
}

#[tokio::test]
async fn the_sqlite_store_drives_a_full_game_round() {
    use std::sync::Arc;

    use ggame::{FixedGuardPicker, GameManager, GameState};
    use gprovider::{ChatProvider, ChatRequest, ProviderError, ProviderFuture};

    #[derive(Debug)]
    struct EchoProvider;

    impl ChatProvider for EchoProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Anthropic
        }

        fn configure(&self, _api_key: &str) -> Result<(), ProviderError> {
            Ok(())
        }

        fn send_message<'a>(
            &'a self,
            _request: ChatRequest,
        ) -> ProviderFuture<'a, Result<String, ProviderError>> {
            Box::pin(async move { Ok("I always tell the truth.".to_string()) })
        }

        fn validate_credential<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
            Box::pin(async move { Ok(true) })
        }
    }

    let store = Arc::new(open_store());
    let mut game = GameManager::new(store.clone() as Arc<dyn GameStore>)
        .with_picker(FixedGuardPicker(GuardKind::TruthTeller));

    game.start_new_game(Arc::new(EchoProvider)).await;
    game.send_message("Do you lie?").await;
    game.make_guess(GuardKind::TruthTeller).await;
    assert_eq!(game.state(), GameState::GameOver(true));

    let session_id = game.session_id().cloned().expect("session should exist");
    let session = store
        .load_session(&session_id)
        .await
        .expect("session should persist");
    assert_eq!(session.is_correct, Some(true));

    let messages = store
        .load_messages(&session_id)
        .await
        .expect("messages should persist");
    assert_eq!(messages.len(), 2);
}
