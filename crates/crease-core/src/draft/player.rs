// Player, position and credit types shared by the draft engine.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Cricket positions that carry a minimum quota in a fantasy team.
///
/// Declaration order is the fixed reporting order (wicket-keeper first,
/// bowler last) and drives `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    WicketKeeper,
    Batsman,
    AllRounder,
    Bowler,
}

impl Position {
    /// All positions in reporting order.
    pub const ALL: [Position; 4] = [
        Position::WicketKeeper,
        Position::Batsman,
        Position::AllRounder,
        Position::Bowler,
    ];

    /// Parse a position string.
    ///
    /// Accepts the canonical kebab-case names plus the usual abbreviations:
    /// - "wk", "keeper" -> WicketKeeper
    /// - "bat", "batter" -> Batsman
    /// - "ar", "allrounder", "all rounder" -> AllRounder
    /// - "bowl" -> Bowler
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "wicket-keeper" | "wicketkeeper" | "wicket keeper" | "wk" | "keeper" => {
                Some(Position::WicketKeeper)
            }
            "batsman" | "bat" | "batter" => Some(Position::Batsman),
            "all-rounder" | "allrounder" | "all rounder" | "ar" => Some(Position::AllRounder),
            "bowler" | "bowl" => Some(Position::Bowler),
            _ => None,
        }
    }

    /// Canonical wire string (matches the serde representation).
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::WicketKeeper => "wicket-keeper",
            Position::Batsman => "batsman",
            Position::AllRounder => "all-rounder",
            Position::Bowler => "bowler",
        }
    }

    /// Short tag used in compact listings.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Position::WicketKeeper => "WK",
            Position::Batsman => "BAT",
            Position::AllRounder => "AR",
            Position::Bowler => "BOWL",
        }
    }

    /// Human-readable label, pluralized when `count != 1`.
    pub fn label(&self, count: usize) -> &'static str {
        match (self, count == 1) {
            (Position::WicketKeeper, true) => "Wicket-Keeper",
            (Position::WicketKeeper, false) => "Wicket-Keepers",
            (Position::Batsman, true) => "Batsman",
            (Position::Batsman, false) => "Batsmen",
            (Position::AllRounder, true) => "All-Rounder",
            (Position::AllRounder, false) => "All-Rounders",
            (Position::Bowler, true) => "Bowler",
            (Position::Bowler, false) => "Bowlers",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// TeamSide
// ---------------------------------------------------------------------------

/// Which of the two real-world teams in the match a player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Team1,
    Team2,
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Team1 => write!(f, "team1"),
            TeamSide::Team2 => write!(f, "team2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Credits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid credit amount: {0}")]
pub struct InvalidCredits(pub f64);

/// A credit amount stored as fixed-point hundredths, so that sums of
/// fractional prices (8.5 + 9.5 ...) compare exactly against the budget.
///
/// Serializes as a plain JSON/TOML number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Credits(i64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    /// Whole credits.
    pub const fn from_whole(credits: i64) -> Self {
        Credits(credits * 100)
    }

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Credits(hundredths)
    }

    /// Convert a floating-point amount, rounding to the nearest hundredth.
    /// Returns `None` for NaN or infinite input.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Credits((value * 100.0).round() as i64))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn hundredths(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<f64> for Credits {
    type Error = InvalidCredits;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Credits::from_f64(value).ok_or(InvalidCredits(value))
    }
}

impl From<Credits> for f64 {
    fn from(c: Credits) -> f64 {
        c.as_f64()
    }
}

impl Add for Credits {
    type Output = Credits;

    fn add(self, rhs: Credits) -> Credits {
        Credits(self.0 + rhs.0)
    }
}

impl Sub for Credits {
    type Output = Credits;

    fn sub(self, rhs: Credits) -> Credits {
        Credits(self.0 - rhs.0)
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Credits {
        iter.fold(Credits::ZERO, |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Credits> for Credits {
    fn sum<I: Iterator<Item = &'a Credits>>(iter: I) -> Credits {
        iter.copied().sum()
    }
}

impl fmt::Display for Credits {
    /// Trailing zero decimals are dropped: `95`, `8.5`, `8.25`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / 100;
        let frac = abs % 100;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player available for selection in one match.
///
/// Read-only to the draft engine. `fantasy_price` is always concrete here;
/// missing prices are defaulted once when the pool is ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub position: Position,
    pub fantasy_price: Credits,
    pub team: TeamSide,
}

impl Player {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_parses_names_and_abbreviations() {
        assert_eq!(Position::from_str_pos("wicket-keeper"), Some(Position::WicketKeeper));
        assert_eq!(Position::from_str_pos("WK"), Some(Position::WicketKeeper));
        assert_eq!(Position::from_str_pos("Batsman"), Some(Position::Batsman));
        assert_eq!(Position::from_str_pos("batter"), Some(Position::Batsman));
        assert_eq!(Position::from_str_pos("all_rounder"), Some(Position::AllRounder));
        assert_eq!(Position::from_str_pos(" AR "), Some(Position::AllRounder));
        assert_eq!(Position::from_str_pos("bowler"), Some(Position::Bowler));
        assert_eq!(Position::from_str_pos("goalkeeper"), None);
    }

    #[test]
    fn position_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Position::AllRounder).unwrap();
        assert_eq!(json, "\"all-rounder\"");
        let back: Position = serde_json::from_str("\"wicket-keeper\"").unwrap();
        assert_eq!(back, Position::WicketKeeper);
    }

    #[test]
    fn position_order_is_reporting_order() {
        let mut shuffled = vec![
            Position::Bowler,
            Position::WicketKeeper,
            Position::AllRounder,
            Position::Batsman,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Position::ALL.to_vec());
    }

    #[test]
    fn labels_pluralize() {
        assert_eq!(Position::Batsman.label(1), "Batsman");
        assert_eq!(Position::Batsman.label(2), "Batsmen");
        assert_eq!(Position::WicketKeeper.label(1), "Wicket-Keeper");
    }

    #[test]
    fn credits_display_trims_decimals() {
        assert_eq!(Credits::from_whole(95).to_string(), "95");
        assert_eq!(Credits::from_hundredths(850).to_string(), "8.5");
        assert_eq!(Credits::from_hundredths(825).to_string(), "8.25");
        assert_eq!(Credits::from_hundredths(-150).to_string(), "-1.5");
        assert_eq!(Credits::from_hundredths(5).to_string(), "0.05");
    }

    #[test]
    fn credits_sum_is_exact() {
        let prices = [0.1, 0.2, 0.3, 99.4];
        let total: Credits = prices.iter().map(|p| Credits::from_f64(*p).unwrap()).sum();
        assert_eq!(total, Credits::from_whole(100));
    }

    #[test]
    fn credits_reject_non_finite() {
        assert!(Credits::try_from(f64::NAN).is_err());
        assert!(Credits::try_from(f64::INFINITY).is_err());
        assert_eq!(Credits::try_from(8.5).unwrap(), Credits::from_hundredths(850));
    }

    #[test]
    fn player_full_name_falls_back_to_id() {
        let mut p = Player {
            id: "p1".into(),
            first_name: "Virat".into(),
            last_name: "Kohli".into(),
            position: Position::Batsman,
            fantasy_price: Credits::from_whole(10),
            team: TeamSide::Team1,
        };
        assert_eq!(p.full_name(), "Virat Kohli");
        p.first_name.clear();
        p.last_name.clear();
        assert_eq!(p.full_name(), "p1");
    }
}
