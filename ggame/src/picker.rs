//! Guard selection at game start.

use rand::seq::SliceRandom;

use crate::GuardKind;

/// Chooses which guard stands at the door for a new round.
pub trait GuardPicker: Send + Sync {
    fn pick(&self) -> GuardKind;
}

/// Uniform random choice between the two guards.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGuardPicker;

impl GuardPicker for RandomGuardPicker {
    fn pick(&self) -> GuardKind {
        let mut rng = rand::thread_rng();
        // ALL is non-empty, so choose always yields a guard.
        *GuardKind::ALL
            .choose(&mut rng)
            .unwrap_or(&GuardKind::TruthTeller)
    }
}

/// Always picks the same guard. Test seam for deterministic rounds.
#[derive(Debug, Clone, Copy)]
pub struct FixedGuardPicker(pub GuardKind);

impl GuardPicker for FixedGuardPicker {
    fn pick(&self) -> GuardKind {
        self.0
    }
}
