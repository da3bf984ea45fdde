// Team builder: the session-scoped controller that owns a draft and only
// commits changes that keep it on a path to a valid team.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::payload::TeamPayload;
use super::player::{Credits, Player, Position};
use super::roster::{PositionCounts, SideCounts, TeamDraft};
use super::rules::{self, Validation};
use crate::config::RulesConfig;
use crate::pool::PlayerPool;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A rejected draft operation. These are user-facing validation failures,
/// never system faults: the draft is left unchanged and the caller shows the
/// message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("{player_id} is already in your team")]
    DuplicatePlayer { player_id: String },

    #[error("your team already has {roster_size} players")]
    RosterFull { roster_size: usize },

    #[error("not enough credits: {remaining} remaining, {price} needed ({shortfall} short)")]
    BudgetExceeded {
        remaining: Credits,
        price: Credits,
        shortfall: Credits,
    },

    #[error(
        "cannot add another {position}: the remaining slots are needed for {}",
        position_list(.needed)
    )]
    PositionLockout {
        position: Position,
        needed: Vec<Position>,
    },

    #[error("team is incomplete, still need: {}", .missing.join(", "))]
    IncompleteRoster { missing: Vec<String> },

    #[error("choose both a captain and a vice-captain before saving")]
    LeadershipIncomplete,

    #[error("{player_id} is not in your team")]
    PlayerNotSelected { player_id: String },

    #[error("{player_id} is not in the player pool")]
    UnknownPlayer { player_id: String },

    #[error("{player_id} cannot be both captain and vice-captain")]
    LeadershipConflict { player_id: String },
}

fn position_list(positions: &[Position]) -> String {
    positions
        .iter()
        .map(|p| p.label(1))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Leadership
// ---------------------------------------------------------------------------

/// A leadership role within the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Leadership {
    Captain,
    ViceCaptain,
}

/// Read-only snapshot of the draft for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub players: Vec<Player>,
    pub roster_size: usize,
    pub positions: PositionCounts,
    pub sides: SideCounts,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub captain_id: Option<String>,
    pub vice_captain_id: Option<String>,
    pub validation: Validation,
}

// ---------------------------------------------------------------------------
// TeamBuilder
// ---------------------------------------------------------------------------

/// Owns one `TeamDraft` for one editing session.
#[derive(Debug, Clone)]
pub struct TeamBuilder {
    rules: RulesConfig,
    draft: TeamDraft,
}

impl TeamBuilder {
    /// Start an empty draft under the given rules.
    pub fn new(rules: RulesConfig) -> Self {
        TeamBuilder {
            rules,
            draft: TeamDraft::new(),
        }
    }

    /// Re-open a saved team for editing.
    ///
    /// Every player is looked up in `pool` and re-added through
    /// `add_player`, so a team saved under different prices is re-checked
    /// against the current ones. Captain and vice-captain are then set
    /// directly: both must be selected and they must differ.
    pub fn from_payload(
        rules: RulesConfig,
        pool: &PlayerPool,
        payload: &TeamPayload,
    ) -> Result<Self, DraftError> {
        if payload.captain_id == payload.vice_captain_id {
            return Err(DraftError::LeadershipConflict {
                player_id: payload.captain_id.clone(),
            });
        }

        let mut builder = TeamBuilder::new(rules);
        for player_id in &payload.players {
            builder.add_by_id(pool, player_id)?;
        }
        for leader in [&payload.captain_id, &payload.vice_captain_id] {
            if !builder.draft.contains(leader) {
                return Err(DraftError::PlayerNotSelected {
                    player_id: leader.clone(),
                });
            }
        }
        builder.draft.set_captain(Some(payload.captain_id.clone()));
        builder.draft.set_vice_captain(Some(payload.vice_captain_id.clone()));
        debug!(players = builder.draft.len(), "re-opened saved team for editing");
        Ok(builder)
    }

    pub fn draft(&self) -> &TeamDraft {
        &self.draft
    }

    /// Run every add-time check without mutating.
    ///
    /// Order: duplicate, roster full, position lockout, budget. Lockout is
    /// checked before budget, so a pick failing both reports the lockout.
    pub fn check_player(&self, player: &Player) -> Result<(), DraftError> {
        if self.draft.contains(&player.id) {
            return Err(DraftError::DuplicatePlayer {
                player_id: player.id.clone(),
            });
        }

        if self.draft.len() >= self.rules.roster_size {
            return Err(DraftError::RosterFull {
                roster_size: self.rules.roster_size,
            });
        }

        if !self.can_select_position(player.position) {
            return Err(DraftError::PositionLockout {
                position: player.position,
                needed: rules::deficient_positions(&self.draft, &self.rules),
            });
        }

        let remaining = self.credits_remaining();
        if player.fantasy_price > remaining {
            return Err(DraftError::BudgetExceeded {
                remaining,
                price: player.fantasy_price,
                shortfall: player.fantasy_price - remaining,
            });
        }

        Ok(())
    }

    /// Add a player to the draft. On rejection the draft is unchanged.
    pub fn add_player(&mut self, player: Player) -> Result<&TeamDraft, DraftError> {
        if let Err(e) = self.check_player(&player) {
            debug!(player_id = %player.id, error = %e, "pick rejected");
            return Err(e);
        }

        debug!(
            player_id = %player.id,
            position = %player.position,
            price = %player.fantasy_price,
            "player added"
        );
        self.draft.push(player);
        Ok(&self.draft)
    }

    /// Look a player up in the pool and add it.
    pub fn add_by_id(
        &mut self,
        pool: &PlayerPool,
        player_id: &str,
    ) -> Result<&TeamDraft, DraftError> {
        let player = pool.get(player_id).ok_or_else(|| DraftError::UnknownPlayer {
            player_id: player_id.to_string(),
        })?;
        self.add_player(player.clone())
    }

    /// Remove a player, clearing any captain/vice-captain role it held.
    /// Removing a player that is not selected is a no-op.
    pub fn remove_player(&mut self, player_id: &str) -> &TeamDraft {
        if let Some(removed) = self.draft.remove(player_id) {
            debug!(player_id = %removed.id, "player removed");
        }
        &self.draft
    }

    /// Whether one more player at `position` is currently allowed.
    pub fn can_select_position(&self, position: Position) -> bool {
        rules::can_select_position(&self.draft, &self.rules, position)
    }

    /// Toggle the captaincy for a selected player.
    ///
    /// - the current captain: captaincy is cleared;
    /// - the current vice-captain: the vice-captaincy is cleared and nobody
    ///   is made captain;
    /// - anyone else: becomes captain, replacing the previous one.
    pub fn assign_captain(&mut self, player_id: &str) -> Result<&TeamDraft, DraftError> {
        self.assign_role(Leadership::Captain, player_id)
    }

    /// Toggle the vice-captaincy; mirror image of `assign_captain`.
    pub fn assign_vice_captain(&mut self, player_id: &str) -> Result<&TeamDraft, DraftError> {
        self.assign_role(Leadership::ViceCaptain, player_id)
    }

    fn assign_role(&mut self, role: Leadership, player_id: &str) -> Result<&TeamDraft, DraftError> {
        if !self.draft.contains(player_id) {
            return Err(DraftError::PlayerNotSelected {
                player_id: player_id.to_string(),
            });
        }

        let (held, other) = match role {
            Leadership::Captain => (self.draft.captain_id(), self.draft.vice_captain_id()),
            Leadership::ViceCaptain => (self.draft.vice_captain_id(), self.draft.captain_id()),
        };
        let holds_role = held == Some(player_id);
        let holds_other = other == Some(player_id);

        match (role, holds_role, holds_other) {
            (Leadership::Captain, true, _) => self.draft.set_captain(None),
            (Leadership::ViceCaptain, true, _) => self.draft.set_vice_captain(None),
            (Leadership::Captain, false, true) => self.draft.set_vice_captain(None),
            (Leadership::ViceCaptain, false, true) => self.draft.set_captain(None),
            (Leadership::Captain, false, false) => {
                self.draft.set_captain(Some(player_id.to_string()))
            }
            (Leadership::ViceCaptain, false, false) => {
                self.draft.set_vice_captain(Some(player_id.to_string()))
            }
        }

        debug!(
            player_id,
            ?role,
            captain = ?self.draft.captain_id(),
            vice_captain = ?self.draft.vice_captain_id(),
            "leadership updated"
        );
        Ok(&self.draft)
    }

    /// The role a player holds, if any.
    pub fn leadership(&self, player_id: &str) -> Option<Leadership> {
        if self.draft.captain_id() == Some(player_id) {
            Some(Leadership::Captain)
        } else if self.draft.vice_captain_id() == Some(player_id) {
            Some(Leadership::ViceCaptain)
        } else {
            None
        }
    }

    /// Scoring multiplier for a player's fantasy points.
    pub fn points_multiplier(&self, player_id: &str) -> f64 {
        match self.leadership(player_id) {
            Some(Leadership::Captain) => self.rules.captain_multiplier,
            Some(Leadership::ViceCaptain) => self.rules.vice_captain_multiplier,
            None => 1.0,
        }
    }

    /// Roster size, position minimums and budget. Captaincy is checked by
    /// `finalize`.
    pub fn validate(&self) -> Validation {
        rules::validate(&self.draft, &self.rules)
    }

    pub fn credits_remaining(&self) -> Credits {
        self.draft.credits_remaining(self.rules.credit_budget)
    }

    /// Pool players that `add_player` would accept right now.
    pub fn selectable<'a>(&self, pool: &'a PlayerPool) -> Vec<&'a Player> {
        pool.players()
            .iter()
            .filter(|p| self.check_player(p).is_ok())
            .collect()
    }

    /// Assemble the save payload once the roster is complete and both
    /// leaders are chosen.
    pub fn finalize(&self) -> Result<TeamPayload, DraftError> {
        let validation = self.validate();
        if !validation.is_valid {
            return Err(DraftError::IncompleteRoster {
                missing: validation.missing,
            });
        }

        let (Some(captain), Some(vice_captain)) =
            (self.draft.captain_id(), self.draft.vice_captain_id())
        else {
            return Err(DraftError::LeadershipIncomplete);
        };

        let payload = TeamPayload {
            players: self.draft.player_ids(),
            captain_id: captain.to_string(),
            vice_captain_id: vice_captain.to_string(),
        };
        info!(
            captain = %payload.captain_id,
            vice_captain = %payload.vice_captain_id,
            credits_used = %self.draft.credits_used(),
            "team finalized"
        );
        Ok(payload)
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            players: self.draft.players().to_vec(),
            roster_size: self.rules.roster_size,
            positions: self.draft.position_counts(),
            sides: self.draft.side_counts(),
            credits_used: self.draft.credits_used(),
            credits_remaining: self.credits_remaining(),
            captain_id: self.draft.captain_id().map(str::to_string),
            vice_captain_id: self.draft.vice_captain_id().map(str::to_string),
            validation: self.validate(),
        }
    }
}
