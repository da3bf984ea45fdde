// The team draft aggregate: selected players plus captain and vice-captain.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::player::{Credits, Player, Position, TeamSide};

/// Number of selected players at each position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCounts {
    pub wicket_keeper: usize,
    pub batsman: usize,
    pub all_rounder: usize,
    pub bowler: usize,
}

impl PositionCounts {
    pub fn get(&self, pos: Position) -> usize {
        match pos {
            Position::WicketKeeper => self.wicket_keeper,
            Position::Batsman => self.batsman,
            Position::AllRounder => self.all_rounder,
            Position::Bowler => self.bowler,
        }
    }

    fn bump(&mut self, pos: Position) {
        match pos {
            Position::WicketKeeper => self.wicket_keeper += 1,
            Position::Batsman => self.batsman += 1,
            Position::AllRounder => self.all_rounder += 1,
            Position::Bowler => self.bowler += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wicket_keeper + self.batsman + self.all_rounder + self.bowler
    }
}

impl Index<Position> for PositionCounts {
    type Output = usize;

    fn index(&self, pos: Position) -> &usize {
        match pos {
            Position::WicketKeeper => &self.wicket_keeper,
            Position::Batsman => &self.batsman,
            Position::AllRounder => &self.all_rounder,
            Position::Bowler => &self.bowler,
        }
    }
}

/// Number of selected players from each real-world team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounts {
    pub team1: usize,
    pub team2: usize,
}

impl SideCounts {
    pub fn get(&self, side: TeamSide) -> usize {
        match side {
            TeamSide::Team1 => self.team1,
            TeamSide::Team2 => self.team2,
        }
    }
}

/// An in-progress fantasy team for one match.
///
/// Players are unique by id and kept in selection order. The captain and
/// vice-captain are stored as ids and always refer to selected players:
/// removing a player clears any role that player held.
///
/// Mutation goes through `TeamBuilder`, which enforces the size, quota and
/// budget rules; this type only keeps its own references consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDraft {
    players: Vec<Player>,
    captain: Option<String>,
    vice_captain: Option<String>,
}

impl TeamDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected players in selection order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of selected players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether a player with this id is selected.
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn captain_id(&self) -> Option<&str> {
        self.captain.as_deref()
    }

    pub fn vice_captain_id(&self) -> Option<&str> {
        self.vice_captain.as_deref()
    }

    pub fn captain(&self) -> Option<&Player> {
        self.captain_id().and_then(|id| self.player(id))
    }

    pub fn vice_captain(&self) -> Option<&Player> {
        self.vice_captain_id().and_then(|id| self.player(id))
    }

    pub fn position_counts(&self) -> PositionCounts {
        let mut counts = PositionCounts::default();
        for p in &self.players {
            counts.bump(p.position);
        }
        counts
    }

    pub fn side_counts(&self) -> SideCounts {
        let mut counts = SideCounts::default();
        for p in &self.players {
            match p.team {
                TeamSide::Team1 => counts.team1 += 1,
                TeamSide::Team2 => counts.team2 += 1,
            }
        }
        counts
    }

    /// Sum of `fantasy_price` over the selected players.
    pub fn credits_used(&self) -> Credits {
        self.players.iter().map(|p| p.fantasy_price).sum()
    }

    /// `budget - credits_used()`. Negative only for drafts re-seeded under
    /// changed prices; `TeamBuilder::add_player` never commits past budget.
    pub fn credits_remaining(&self, budget: Credits) -> Credits {
        budget - self.credits_used()
    }

    /// Selected players grouped by position, every position present (possibly
    /// empty), each group in selection order.
    pub fn by_position(&self) -> BTreeMap<Position, Vec<&Player>> {
        let mut groups: BTreeMap<Position, Vec<&Player>> =
            Position::ALL.iter().map(|p| (*p, Vec::new())).collect();
        for p in &self.players {
            groups.entry(p.position).or_default().push(p);
        }
        groups
    }

    /// Ids of the selected players in selection order.
    pub fn player_ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub(crate) fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Remove a player, clearing any role the player held. Returns the
    /// removed player, or `None` if it was not selected.
    pub(crate) fn remove(&mut self, player_id: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == player_id)?;
        if self.captain.as_deref() == Some(player_id) {
            self.captain = None;
        }
        if self.vice_captain.as_deref() == Some(player_id) {
            self.vice_captain = None;
        }
        Some(self.players.remove(idx))
    }

    pub(crate) fn set_captain(&mut self, player_id: Option<String>) {
        self.captain = player_id;
    }

    pub(crate) fn set_vice_captain(&mut self, player_id: Option<String>) {
        self.vice_captain = player_id;
    }
}
