//! Guard personas, game lifecycle states, and persisted record types.

use std::time::SystemTime;

use gcommon::{MessageId, SessionId};
use gprovider::TurnRole;
use uuid::Uuid;

const TRUTH_TELLER_PROMPT: &str = "You are playing a riddle game. You are one of two guards - the one who ALWAYS tells the truth. \
Answer all questions truthfully. Do not reveal which guard you are unless directly deduced. \
Keep responses concise and in-character. You are guarding a door.";

const LIAR_PROMPT: &str = "You are playing a riddle game. You are one of two guards - the one who ALWAYS lies. \
Answer all questions with lies. Do not reveal which guard you are unless directly deduced. \
Keep responses concise and in-character. You are guarding a door.";

/// The two guard personas. The persona is fixed when a game starts and
/// hidden from the player until they guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    TruthTeller,
    Liar,
}

impl GuardKind {
    pub const ALL: [GuardKind; 2] = [GuardKind::TruthTeller, GuardKind::Liar];

    /// Persona instructions sent as the system prompt on every exchange.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::TruthTeller => TRUTH_TELLER_PROMPT,
            Self::Liar => LIAR_PROMPT,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::TruthTeller => "Truth-Teller",
            Self::Liar => "Liar",
        }
    }

    /// Stable string stored in session records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TruthTeller => "truthTeller",
            Self::Liar => "liar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "truthTeller" => Some(Self::TruthTeller),
            "liar" => Some(Self::Liar),
            _ => None,
        }
    }
}

/// Game lifecycle. `GameOver` carries whether the player's guess was
/// correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    SettingUp,
    Playing,
    GameOver(bool),
}

/// One persisted conversation message, tied to its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub role: TurnRole,
    pub content: String,
    pub sent_at: SystemTime,
}

impl ChatMessage {
    pub fn new(session_id: SessionId, role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(Uuid::new_v4().to_string()),
            session_id,
            role,
            content: content.into(),
            sent_at: SystemTime::now(),
        }
    }
}

/// One game round: which guard was on the door, what the player guessed,
/// and when it ran. `player_guess`, `is_correct`, and `ended_at` are set
/// together when the round completes, never individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: SessionId,
    pub guard: GuardKind,
    pub player_guess: Option<GuardKind>,
    pub is_correct: Option<bool>,
    pub started_at: SystemTime,
    pub ended_at: Option<SystemTime>,
}

impl GameSession {
    pub fn new(guard: GuardKind) -> Self {
        Self {
            id: SessionId::new(Uuid::new_v4().to_string()),
            guard,
            player_guess: None,
            is_correct: None,
            started_at: SystemTime::now(),
            ended_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Seals the round with the player's guess. Correctness is derived
    /// here so records can never disagree with the guard they store.
    pub fn complete(&mut self, player_guess: GuardKind) -> SessionOutcome {
        let outcome = SessionOutcome {
            player_guess,
            is_correct: player_guess == self.guard,
            ended_at: SystemTime::now(),
        };

        self.player_guess = Some(outcome.player_guess);
        self.is_correct = Some(outcome.is_correct);
        self.ended_at = Some(outcome.ended_at);
        outcome
    }
}

/// The completion fields written to a session record in one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub player_guess: GuardKind,
    pub is_correct: bool,
    pub ended_at: SystemTime,
}
