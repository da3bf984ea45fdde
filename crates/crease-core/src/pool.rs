// Player pool loading: the players of both real-world teams for one match.
//
// Accepts the roster service's JSON shape (`team1`/`team2` squads) or a flat
// CSV with a team column. Missing prices are defaulted here, once, so the
// draft engine only ever sees concrete prices.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::draft::player::{Credits, Player, Position, TeamSide};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid player pool JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("player record without an id")]
    MissingId,

    #[error("player {id}: unknown position `{position}`")]
    UnknownPosition { id: String, position: String },

    #[error("player {id}: invalid fantasy price {price}")]
    InvalidPrice { id: String, price: f64 },

    #[error("duplicate player id {0}")]
    DuplicateId(String),

    #[error("player {id}: a match has two teams, found a third (`{team}`)")]
    TooManyTeams { id: String, team: String },
}

// ---------------------------------------------------------------------------
// Raw input records
// ---------------------------------------------------------------------------

/// A player as sent by the match/roster service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub position: String,
    #[serde(default)]
    pub fantasy_price: Option<f64>,
}

impl PlayerRecord {
    /// Convert into a `Player`. An absent or zero price becomes
    /// `default_price`; negative or non-finite prices are rejected.
    pub fn into_player(self, team: TeamSide, default_price: Credits) -> Result<Player, PoolError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(PoolError::MissingId);
        }

        let position =
            Position::from_str_pos(&self.position).ok_or_else(|| PoolError::UnknownPosition {
                id: id.clone(),
                position: self.position.clone(),
            })?;

        let fantasy_price = match self.fantasy_price {
            None => {
                debug!(player_id = %id, price = %default_price, "no fantasy price, using default");
                default_price
            }
            Some(p) if p == 0.0 => {
                debug!(
                    player_id = %id,
                    price = %default_price,
                    "zero fantasy price, using default"
                );
                default_price
            }
            Some(p) => match Credits::from_f64(p) {
                Some(c) if !c.is_negative() => c,
                _ => return Err(PoolError::InvalidPrice { id, price: p }),
            },
        };

        Ok(Player {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            position,
            fantasy_price,
            team,
        })
    }
}

/// One real-world team's squad as sent by the roster service.
#[derive(Debug, Clone, Deserialize)]
pub struct SquadRecord {
    #[serde(default)]
    pub name: String,
    pub players: Vec<PlayerRecord>,
}

#[derive(Debug, Deserialize)]
struct SquadFile {
    team1: SquadRecord,
    team2: SquadRecord,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    position: String,
    #[serde(default)]
    fantasy_price: Option<f64>,
    team: String,
}

// ---------------------------------------------------------------------------
// PlayerPool
// ---------------------------------------------------------------------------

/// Every selectable player for one match, unique by id.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPool {
    team1_name: String,
    team2_name: String,
    players: Vec<Player>,
}

impl PlayerPool {
    pub fn new(team1_name: impl Into<String>, team2_name: impl Into<String>) -> Self {
        PlayerPool {
            team1_name: team1_name.into(),
            team2_name: team2_name.into(),
            players: Vec::new(),
        }
    }

    /// Add a player; ids must be unique across both teams.
    pub fn insert(&mut self, player: Player) -> Result<(), PoolError> {
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(PoolError::DuplicateId(player.id));
        }
        self.players.push(player);
        Ok(())
    }

    /// Build a pool from the two squads. Records that cannot be converted
    /// (no id, unknown position, bad price) are skipped with a warning;
    /// duplicate ids are an error.
    pub fn from_squads(
        team1: SquadRecord,
        team2: SquadRecord,
        default_price: Credits,
    ) -> Result<Self, PoolError> {
        let mut pool = PlayerPool::new(team1.name, team2.name);
        let squads = [
            (TeamSide::Team1, team1.players),
            (TeamSide::Team2, team2.players),
        ];
        for (side, records) in squads {
            for record in records {
                match record.into_player(side, default_price) {
                    Ok(player) => pool.insert(player)?,
                    Err(e) => warn!("skipping player record: {}", e),
                }
            }
        }
        debug!(players = pool.len(), "player pool built");
        Ok(pool)
    }

    /// Parse the roster service's JSON: `{"team1": {...}, "team2": {...}}`.
    pub fn from_json(text: &str, default_price: Credits) -> Result<Self, PoolError> {
        Self::from_json_with_origin(text, "input", default_price)
    }

    /// Like `from_json`, naming `origin` (usually the file path) in parse
    /// errors.
    pub fn from_json_with_origin(
        text: &str,
        origin: &str,
        default_price: Credits,
    ) -> Result<Self, PoolError> {
        let file: SquadFile = serde_json::from_str(text).map_err(|e| PoolError::Json {
            origin: origin.to_string(),
            source: e,
        })?;
        Self::from_squads(file.team1, file.team2, default_price)
    }

    pub fn load_json(path: &Path, default_price: Credits) -> Result<Self, PoolError> {
        let text = std::fs::read_to_string(path).map_err(|e| PoolError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_with_origin(&text, &path.display().to_string(), default_price)
    }

    /// Load a CSV with columns `id,first_name,last_name,position,fantasy_price,team`.
    /// The first team name seen becomes team1, the second team2.
    pub fn load_csv(path: &Path, default_price: Credits) -> Result<Self, PoolError> {
        let file = std::fs::File::open(path).map_err(|e| PoolError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        load_csv_from_reader(file, default_price).map_err(|e| match e {
            CsvLoadError::Csv(source) => PoolError::Csv {
                path: path.to_path_buf(),
                source,
            },
            CsvLoadError::Pool(e) => e,
        })
    }

    /// Load by file extension: `.csv` as CSV, anything else as JSON.
    pub fn load(path: &Path, default_price: Credits) -> Result<Self, PoolError> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::load_csv(path, default_price)
        } else {
            Self::load_json(path, default_price)
        }
    }

    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn by_side(&self, side: TeamSide) -> Vec<&Player> {
        self.players.iter().filter(|p| p.team == side).collect()
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Team1 => &self.team1_name,
            TeamSide::Team2 => &self.team2_name,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reader-based CSV loader (enables testing without temp files)
// ---------------------------------------------------------------------------

enum CsvLoadError {
    Csv(csv::Error),
    Pool(PoolError),
}

fn load_csv_from_reader<R: Read>(
    rdr: R,
    default_price: Credits,
) -> Result<PlayerPool, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut sides: HashMap<String, TeamSide> = HashMap::new();
    let mut names: Vec<String> = Vec::new();
    let mut players = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(CsvLoadError::Csv(e)),
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
                continue;
            }
        };

        let side = match sides.get(&row.team) {
            Some(side) => *side,
            None => {
                let side = match names.len() {
                    0 => TeamSide::Team1,
                    1 => TeamSide::Team2,
                    _ => {
                        return Err(CsvLoadError::Pool(PoolError::TooManyTeams {
                            id: row.id,
                            team: row.team,
                        }))
                    }
                };
                sides.insert(row.team.clone(), side);
                names.push(row.team.clone());
                side
            }
        };

        let record = PlayerRecord {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            position: row.position,
            fantasy_price: row.fantasy_price,
        };
        match record.into_player(side, default_price) {
            Ok(player) => players.push(player),
            Err(e) => warn!("skipping player row: {}", e),
        }
    }

    let mut pool = PlayerPool::new(
        names.first().cloned().unwrap_or_default(),
        names.get(1).cloned().unwrap_or_default(),
    );
    for player in players {
        pool.insert(player).map_err(CsvLoadError::Pool)?;
    }
    Ok(pool)
}
