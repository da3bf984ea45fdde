// Eligibility predicates: position quotas, lockout and roster validation.
//
// Everything here is a pure function of a draft and the rules; nothing
// mutates. `TeamBuilder` consults these before committing a change.

use serde::{Deserialize, Serialize};

use super::player::Position;
use super::roster::{PositionCounts, TeamDraft};
use crate::config::RulesConfig;

/// Outcome of checking a draft against the roster rules (size, position
/// minimums, budget). Captaincy is checked separately at finalize time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    /// Human-readable deficiencies in fixed order: player shortfall, then
    /// wicket-keeper, batsman, all-rounder, bowler, then budget overrun.
    pub missing: Vec<String>,
}

/// Open roster slots.
pub fn remaining_slots(draft: &TeamDraft, rules: &RulesConfig) -> usize {
    rules.roster_size.saturating_sub(draft.len())
}

/// How many more players each position needs to reach its minimum.
pub fn still_required(draft: &TeamDraft, rules: &RulesConfig) -> PositionCounts {
    let counts = draft.position_counts();
    let need = |pos: Position| rules.min_per_position.get(pos).saturating_sub(counts.get(pos));
    PositionCounts {
        wicket_keeper: need(Position::WicketKeeper),
        batsman: need(Position::Batsman),
        all_rounder: need(Position::AllRounder),
        bowler: need(Position::Bowler),
    }
}

/// Positions still below their minimum, in reporting order.
pub fn deficient_positions(draft: &TeamDraft, rules: &RulesConfig) -> Vec<Position> {
    let needed = still_required(draft, rules);
    Position::ALL
        .iter()
        .copied()
        .filter(|p| needed.get(*p) > 0)
        .collect()
}

/// Whether one more player at `position` keeps the draft completable.
///
/// A position that is itself still short is always selectable while a slot
/// is open. Any other pick takes a slot, and is refused once the slots left
/// after it could no longer cover the outstanding minimums.
pub fn can_select_position(draft: &TeamDraft, rules: &RulesConfig, position: Position) -> bool {
    let selected = draft.len();
    if selected >= rules.roster_size {
        return false;
    }

    let needed = still_required(draft, rules);
    if needed.get(position) > 0 {
        return true;
    }

    let total_needed = needed.total();
    let remaining = rules.roster_size - selected;
    !(total_needed > 0 && remaining - 1 < total_needed)
}

/// Check roster size, position minimums and budget.
pub fn validate(draft: &TeamDraft, rules: &RulesConfig) -> Validation {
    let mut missing = Vec::new();

    let selected = draft.len();
    if selected < rules.roster_size {
        missing.push(format!("{} more players", rules.roster_size - selected));
    }

    let needed = still_required(draft, rules);
    for pos in Position::ALL {
        let n = needed.get(pos);
        if n > 0 {
            missing.push(format!("{n} {}", pos.label(n)));
        }
    }

    let used = draft.credits_used();
    if used > rules.credit_budget {
        missing.push(format!("{} credits over budget", used - rules.credit_budget));
    }

    Validation {
        is_valid: missing.is_empty() && selected == rules.roster_size,
        missing,
    }
}
