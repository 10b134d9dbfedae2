use std::sync::{Arc, Mutex};

use gcommon::SessionId;
use ggame::{
    FixedGuardPicker, GameManager, GameRuntimeHooks, GameState, GameStore, GuardKind,
    InMemoryGameStore,
};
use gprovider::{
    ChatProvider, ChatRequest, ProviderError, ProviderFuture, ProviderId, TurnRole,
};

#[derive(Debug)]
struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    captured_requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn replying(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .iter()
                    .rev()
                    .map(|reply| Ok(reply.to_string()))
                    .collect(),
            ),
            captured_requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(vec![Err(error)]),
            captured_requests: Mutex::new(Vec::new()),
        })
    }

    fn captured(&self) -> Vec<ChatRequest> {
        self.captured_requests.lock().expect("request lock").clone()
    }
}

impl ChatProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn configure(&self, _api_key: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    fn send_message<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            self.captured_requests
                .lock()
                .expect("request lock")
                .push(request);
            self.replies
                .lock()
                .expect("reply lock")
                .pop()
                .unwrap_or_else(|| Err(ProviderError::invalid_response("script exhausted")))
        })
    }

    fn validate_credential<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move { Ok(true) })
    }
}

fn liar_game(store: Arc<InMemoryGameStore>) -> GameManager {
    GameManager::new(store).with_picker(FixedGuardPicker(GuardKind::Liar))
}

#[tokio::test]
async fn a_full_round_against_the_liar_settles_a_wrong_guess() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["No."]);
    let mut game = liar_game(store.clone());

    game.start_new_game(provider.clone()).await;
    assert_eq!(game.state(), GameState::Playing);
    assert!(!game.can_make_guess());

    game.send_message("Are you the liar?").await;
    assert_eq!(game.messages().len(), 2);
    assert_eq!(game.messages()[1].content, "No.");
    assert!(game.can_make_guess());

    // The liar said "No", so believing it means guessing truth-teller.
    game.make_guess(GuardKind::TruthTeller).await;
    assert_eq!(game.state(), GameState::GameOver(false));
    assert_eq!(game.actual_guard(), Some(GuardKind::Liar));

    let session_id = game.session_id().cloned().expect("session should exist");
    let session = store
        .load_session(&session_id)
        .await
        .expect("session should persist");
    assert_eq!(session.player_guess, Some(GuardKind::TruthTeller));
    assert_eq!(session.is_correct, Some(false));
    assert!(session.is_complete());
}

#[tokio::test]
async fn the_guard_persona_rides_in_the_system_prompt() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["I never lie."]);
    let mut game = liar_game(store);

    game.start_new_game(provider.clone()).await;
    game.send_message("Do you ever lie?").await;

    let requests = provider.captured();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].system_prompt.contains("ALWAYS lies"));
    assert!(requests[0].history.is_empty());
    assert_eq!(requests[0].user_message, "Do you ever lie?");
}

#[tokio::test]
async fn later_turns_carry_the_prior_exchange_as_history() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["Greetings.", "The other door."]);
    let mut game = liar_game(store);

    game.start_new_game(provider.clone()).await;
    game.send_message("Hello").await;
    game.send_message("Which door is safe?").await;

    let requests = provider.captured();
    assert_eq!(requests.len(), 2);

    let history = &requests[1].history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, TurnRole::User);
    assert_eq!(history[0].content, "Hello");
    assert_eq!(history[1].role, TurnRole::Assistant);
    assert_eq!(history[1].content, "Greetings.");
    assert_eq!(requests[1].user_message, "Which door is safe?");
}

#[tokio::test]
async fn an_authentication_failure_keeps_the_player_message() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::failing(ProviderError::invalid_credential("bad key"));
    let mut game = liar_game(store);

    game.start_new_game(provider).await;
    game.send_message("Are you real?").await;

    assert_eq!(game.state(), GameState::Playing);
    assert!(!game.is_processing());
    assert_eq!(game.messages().len(), 1);
    assert_eq!(game.messages()[0].role, TurnRole::User);
    assert_eq!(
        game.error_message(),
        Some("Invalid API key. Please check your API key in Settings.")
    );
}

#[tokio::test]
async fn a_rate_limit_surfaces_its_own_player_facing_text() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::failing(ProviderError::rate_limited("slow down"));
    let mut game = liar_game(store);

    game.start_new_game(provider).await;
    game.send_message("Hello?").await;

    assert_eq!(
        game.error_message(),
        Some("Rate limit exceeded. Please wait a moment and try again.")
    );
    assert!(game.can_make_guess());
}

#[tokio::test]
async fn a_successful_turn_clears_an_earlier_error() {
    let store = Arc::new(InMemoryGameStore::new());
    let failing = ScriptedProvider::failing(ProviderError::server(503));
    let mut game = liar_game(store.clone());

    game.start_new_game(failing).await;
    game.send_message("First try").await;
    assert!(game.error_message().is_some());

    // The retry goes through a fresh round with a healthy backend.
    let healthy = ScriptedProvider::replying(&["All is well."]);
    game.start_new_game(healthy).await;
    assert!(game.error_message().is_none());
    assert!(game.messages().is_empty());

    game.send_message("Second try").await;
    assert!(game.error_message().is_none());
    assert_eq!(game.messages().len(), 2);
}

#[tokio::test]
async fn blank_input_is_ignored_entirely() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["unused"]);
    let mut game = liar_game(store);

    game.start_new_game(provider.clone()).await;
    game.send_message("   \n\t ").await;

    assert!(game.messages().is_empty());
    assert!(provider.captured().is_empty());
    assert!(game.error_message().is_none());
}

#[tokio::test]
async fn messages_before_a_game_starts_are_ignored() {
    let store = Arc::new(InMemoryGameStore::new());
    let mut game = liar_game(store);

    game.send_message("knock knock").await;
    assert!(game.messages().is_empty());
    assert_eq!(game.state(), GameState::NotStarted);

    game.make_guess(GuardKind::Liar).await;
    assert_eq!(game.state(), GameState::NotStarted);
}

#[tokio::test]
async fn guessing_requires_at_least_one_exchange() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["Hello."]);
    let mut game = liar_game(store);

    game.start_new_game(provider).await;
    assert!(!game.can_make_guess());

    // A premature guess is ignored outright.
    game.make_guess(GuardKind::Liar).await;
    assert_eq!(game.state(), GameState::Playing);

    game.send_message("Hi").await;
    assert!(game.can_make_guess());

    game.make_guess(GuardKind::Liar).await;
    assert_eq!(game.state(), GameState::GameOver(true));
    assert!(!game.can_make_guess());
}

#[tokio::test]
async fn reset_returns_to_a_clean_slate() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["Hello."]);
    let mut game = liar_game(store);

    game.start_new_game(provider).await;
    game.send_message("Hi").await;
    game.make_guess(GuardKind::Liar).await;

    game.reset_game();
    assert_eq!(game.state(), GameState::NotStarted);
    assert!(game.messages().is_empty());
    assert!(game.actual_guard().is_none());
    assert!(game.session_id().is_none());
    assert!(game.error_message().is_none());
}

#[tokio::test]
async fn transcripts_persist_in_exchange_order() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["One.", "Two."]);
    let mut game = liar_game(store.clone());

    game.start_new_game(provider).await;
    game.send_message("first").await;
    game.send_message("second").await;

    let session_id = game.session_id().cloned().expect("session should exist");
    let stored = store
        .load_messages(&session_id)
        .await
        .expect("messages should load");
    let contents: Vec<&str> = stored.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "One.", "second", "Two."]);

    let roles: Vec<TurnRole> = stored.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            TurnRole::User,
            TurnRole::Assistant,
            TurnRole::User,
            TurnRole::Assistant
        ]
    );
}

#[derive(Debug, Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl GameRuntimeHooks for RecordingHooks {
    fn on_game_started(&self, _session_id: &SessionId, provider: ProviderId) {
        self.events
            .lock()
            .expect("event lock")
            .push(format!("started:{provider}"));
    }

    fn on_exchange_succeeded(&self, _session_id: &SessionId, _provider: ProviderId) {
        self.events
            .lock()
            .expect("event lock")
            .push("exchanged".to_string());
    }

    fn on_guess_made(&self, _session_id: &SessionId, correct: bool) {
        self.events
            .lock()
            .expect("event lock")
            .push(format!("guessed:{correct}"));
    }
}

#[tokio::test]
async fn hooks_observe_the_round_lifecycle() {
    let store = Arc::new(InMemoryGameStore::new());
    let provider = ScriptedProvider::replying(&["Hello."]);
    let hooks = Arc::new(RecordingHooks::default());
    let mut game = GameManager::new(store)
        .with_picker(FixedGuardPicker(GuardKind::TruthTeller))
        .with_hooks(hooks.clone());

    game.start_new_game(provider).await;
    game.send_message("Hi").await;
    game.make_guess(GuardKind::TruthTeller).await;

    let events = hooks.events.lock().expect("event lock").clone();
    assert_eq!(events, vec!["started:openai", "exchanged", "guessed:true"]);
}
