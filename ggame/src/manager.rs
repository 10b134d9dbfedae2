//! Round orchestration: the state machine that runs one game of the
//! two-guards riddle against a chat backend.

use std::sync::Arc;
use std::time::SystemTime;

use gcommon::SessionId;
use gprovider::{ChatProvider, ChatRequest, ConversationTurn, TurnRole};

use crate::{
    ChatMessage, GameRuntimeHooks, GameSession, GameState, GameStore, GuardKind, GuardPicker,
    NoopGameHooks, RandomGuardPicker, SessionOutcome,
};

/// Drives one game at a time: starts rounds, relays messages to the
/// guard persona, and settles the player's guess.
///
/// Failures never abort a round. Provider and storage errors surface
/// through [`error_message`](GameManager::error_message) so the player
/// can retry, and an exchanged user message is kept even when the guard
/// never answered it.
pub struct GameManager {
    state: GameState,
    messages: Vec<ChatMessage>,
    processing: bool,
    error_message: Option<String>,
    provider: Option<Arc<dyn ChatProvider>>,
    guard: Option<GuardKind>,
    session_id: Option<SessionId>,
    store: Arc<dyn GameStore>,
    picker: Box<dyn GuardPicker>,
    hooks: Arc<dyn GameRuntimeHooks>,
}

impl GameManager {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            state: GameState::NotStarted,
            messages: Vec::new(),
            processing: false,
            error_message: None,
            provider: None,
            guard: None,
            session_id: None,
            store,
            picker: Box::new(RandomGuardPicker),
            hooks: Arc::new(NoopGameHooks),
        }
    }

    pub fn with_picker(mut self, picker: impl GuardPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn GameRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Begins a fresh round: picks a guard, opens a session record, and
    /// moves to `Playing`. A storage failure is reported but does not
    /// block the round.
    pub async fn start_new_game(&mut self, provider: Arc<dyn ChatProvider>) {
        self.state = GameState::SettingUp;

        let guard = self.picker.pick();
        let session = GameSession::new(guard);
        let session_id = session.id.clone();

        self.messages.clear();
        self.error_message = None;
        self.processing = false;
        self.guard = Some(guard);
        self.session_id = Some(session_id.clone());

        if let Err(error) = self.store.insert_session(session).await {
            self.hooks.on_persistence_failure(&session_id, &error);
            self.error_message = Some(format!("Failed to save game session: {error}"));
        }

        self.hooks.on_game_started(&session_id, provider.id());
        self.provider = Some(provider);
        self.state = GameState::Playing;
    }

    /// Relays one player message to the guard and records both sides of
    /// the exchange. Blank input is ignored; a provider failure keeps
    /// the player's message and surfaces the error text.
    pub async fn send_message(&mut self, text: &str) {
        let trimmed = text.trim();
        let (Some(provider), Some(guard), Some(session_id)) = (
            self.provider.clone(),
            self.guard,
            self.session_id.clone(),
        ) else {
            return;
        };

        if trimmed.is_empty() {
            return;
        }

        self.processing = true;
        self.error_message = None;
        self.hooks.on_turn_start(&session_id);

        // History snapshot before this turn; the new user message rides
        // in the request's dedicated field instead.
        let history: Vec<ConversationTurn> = self
            .messages
            .iter()
            .map(|message| ConversationTurn::new(message.role, message.content.clone()))
            .collect();

        let user_message = ChatMessage::new(session_id.clone(), TurnRole::User, trimmed);
        self.messages.push(user_message.clone());
        if let Err(error) = self.store.append_message(user_message).await {
            self.hooks.on_persistence_failure(&session_id, &error);
            self.error_message = Some(format!("Failed to save message: {error}"));
        }

        let request =
            ChatRequest::new(guard.system_prompt(), trimmed).with_history(history);

        match provider.send_message(request).await {
            Ok(reply) => {
                let assistant_message =
                    ChatMessage::new(session_id.clone(), TurnRole::Assistant, reply);
                self.messages.push(assistant_message.clone());
                if let Err(error) = self.store.append_message(assistant_message).await {
                    self.hooks.on_persistence_failure(&session_id, &error);
                    self.error_message = Some(format!("Failed to save message: {error}"));
                }

                self.hooks.on_exchange_succeeded(&session_id, provider.id());
            }
            Err(error) => {
                self.error_message = Some(error.user_message());
                self.hooks
                    .on_exchange_failed(&session_id, provider.id(), &error);
            }
        }

        self.processing = false;
    }

    /// Settles the round: records the guess against the actual guard and
    /// moves to `GameOver`. Ignored unless a guess is currently allowed.
    /// The result stands even if persisting it fails.
    pub async fn make_guess(&mut self, guess: GuardKind) {
        if !self.can_make_guess() {
            return;
        }

        let (Some(guard), Some(session_id)) = (self.guard, self.session_id.clone()) else {
            return;
        };

        let is_correct = guess == guard;
        let outcome = SessionOutcome {
            player_guess: guess,
            is_correct,
            ended_at: SystemTime::now(),
        };

        if let Err(error) = self.store.complete_session(&session_id, outcome).await {
            self.hooks.on_persistence_failure(&session_id, &error);
            self.error_message = Some(format!("Failed to save game result: {error}"));
        }

        self.hooks.on_guess_made(&session_id, is_correct);
        self.state = GameState::GameOver(is_correct);
    }

    /// Returns to `NotStarted` and forgets everything about the round.
    pub fn reset_game(&mut self) {
        self.state = GameState::NotStarted;
        self.messages.clear();
        self.provider = None;
        self.guard = None;
        self.session_id = None;
        self.error_message = None;
        self.processing = false;
        self.hooks.on_game_reset();
    }

    /// A guess is allowed only mid-round, after at least one exchange,
    /// and never while a message is in flight.
    pub fn can_make_guess(&self) -> bool {
        self.state == GameState::Playing
            && !self.messages.is_empty()
            && !self.processing
            && self.session_id.is_some()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The guard actually on the door, for the result screen.
    pub fn actual_guard(&self) -> Option<GuardKind> {
        self.guard
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }
}
