// Rules configuration loading and parsing (rules.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::player::{Credits, Position};

// ---------------------------------------------------------------------------
// Engine constants
// ---------------------------------------------------------------------------

pub const ROSTER_SIZE: usize = 11;
pub const CREDIT_BUDGET: Credits = Credits::from_whole(100);
pub const MIN_PER_POSITION: usize = 1;
pub const DEFAULT_PLAYER_PRICE: Credits = Credits::from_whole(8);
/// Scoring-time multipliers, applied downstream. Not enforced by the engine.
pub const CAPTAIN_MULTIPLIER: f64 = 2.0;
pub const VICE_CAPTAIN_MULTIPLIER: f64 = 1.5;

/// File name looked up inside a config directory.
pub const RULES_FILE: &str = "rules.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// rules.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[rules]` table in rules.toml.
#[derive(Debug, Clone, Default, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: RulesConfig,
}

/// Constants governing team composition. Every key is optional in TOML and
/// falls back to the stock fantasy-cricket values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub roster_size: usize,
    pub credit_budget: Credits,
    /// Applied once at pool ingestion to players without a price.
    pub default_player_price: Credits,
    pub min_per_position: PositionQuota,
    pub captain_multiplier: f64,
    pub vice_captain_multiplier: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            roster_size: ROSTER_SIZE,
            credit_budget: CREDIT_BUDGET,
            default_player_price: DEFAULT_PLAYER_PRICE,
            min_per_position: PositionQuota::default(),
            captain_multiplier: CAPTAIN_MULTIPLIER,
            vice_captain_multiplier: VICE_CAPTAIN_MULTIPLIER,
        }
    }
}

/// Minimum number of players required at each position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionQuota {
    pub wicket_keeper: usize,
    pub batsman: usize,
    pub all_rounder: usize,
    pub bowler: usize,
}

impl Default for PositionQuota {
    fn default() -> Self {
        PositionQuota {
            wicket_keeper: MIN_PER_POSITION,
            batsman: MIN_PER_POSITION,
            all_rounder: MIN_PER_POSITION,
            bowler: MIN_PER_POSITION,
        }
    }
}

impl PositionQuota {
    pub fn get(&self, pos: Position) -> usize {
        match pos {
            Position::WicketKeeper => self.wicket_keeper,
            Position::Batsman => self.batsman,
            Position::AllRounder => self.all_rounder,
            Position::Bowler => self.bowler,
        }
    }

    pub fn total(&self) -> usize {
        Position::ALL.iter().map(|p| self.get(*p)).sum()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate a rules file at an explicit path.
pub fn load_rules(path: &Path) -> Result<RulesConfig, ConfigError> {
    let text = read_file(path)?;
    let file: RulesFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&file.rules)?;
    Ok(file.rules)
}

/// Load `config/rules.toml` relative to `base_dir`. A missing file is not an
/// error: the stock rules apply.
pub fn load_config_from(base_dir: &Path) -> Result<RulesConfig, ConfigError> {
    let rules_path = base_dir.join("config").join(RULES_FILE);
    if rules_path.exists() {
        load_rules(&rules_path)
    } else {
        Ok(RulesConfig::default())
    }
}

/// Seed `config/rules.toml` from `defaults/rules.toml` when the config copy
/// is missing. The defaults file is parsed and validated first, so a broken
/// template is never copied. Returns the path written, if any.
pub fn seed_rules_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(RULES_FILE);
    let target = base_dir.join("config").join(RULES_FILE);

    if target.exists() || !source.exists() {
        return Ok(None);
    }
    load_rules(&source)?;

    let seed_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(seed_error)?;
    std::fs::copy(&source, &target).map_err(seed_error)?;

    Ok(Some(target))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &RulesConfig) -> Result<(), ConfigError> {
    if config.roster_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "rules.roster_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !config.credit_budget.is_positive() {
        return Err(ConfigError::ValidationError {
            field: "rules.credit_budget".into(),
            message: format!("must be > 0, got {}", config.credit_budget),
        });
    }

    if !config.default_player_price.is_positive() {
        return Err(ConfigError::ValidationError {
            field: "rules.default_player_price".into(),
            message: format!("must be > 0, got {}", config.default_player_price),
        });
    }

    let required = config.min_per_position.total();
    if required > config.roster_size {
        return Err(ConfigError::ValidationError {
            field: "rules.min_per_position".into(),
            message: format!(
                "minimums add up to {required}, more than the roster size {}",
                config.roster_size
            ),
        });
    }

    let multipliers: &[(&str, f64)] = &[
        ("rules.captain_multiplier", config.captain_multiplier),
        ("rules.vice_captain_multiplier", config.vice_captain_multiplier),
    ];
    for (name, val) in multipliers {
        if !val.is_finite() || *val < 1.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be >= 1.0, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    #[test]
    fn defaults_match_engine_constants() {
        let rules = RulesConfig::default();
        assert_eq!(rules.roster_size, 11);
        assert_eq!(rules.credit_budget, Credits::from_whole(100));
        assert_eq!(rules.default_player_price, Credits::from_whole(8));
        assert_eq!(rules.min_per_position.total(), 4);
        assert!((rules.captain_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((rules.vice_captain_multiplier - 1.5).abs() < f64::EPSILON);
        assert!(validate(&rules).is_ok());
    }

    #[test]
    fn shipped_defaults_file_loads() {
        let rules = load_rules(&project_root().join("defaults").join(RULES_FILE))
            .expect("defaults/rules.toml should load");
        assert_eq!(rules, RulesConfig::default());
    }

    #[test]
    fn missing_rules_file_uses_defaults() {
        let tmp = fresh_dir("crease_config_missing_rules");
        let rules = load_config_from(&tmp).expect("absent rules.toml is fine");
        assert_eq!(rules, RulesConfig::default());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_rules_keep_remaining_defaults() {
        let tmp = fresh_dir("crease_config_partial");
        fs::write(
            tmp.join("config").join(RULES_FILE),
            "[rules]\ncredit_budget = 95.5\n\n[rules.min_per_position]\nbowler = 3\n",
        )
        .unwrap();

        let rules = load_config_from(&tmp).expect("should load partial rules");
        assert_eq!(rules.credit_budget, Credits::from_hundredths(9550));
        assert_eq!(rules.roster_size, 11);
        assert_eq!(rules.min_per_position.bowler, 3);
        assert_eq!(rules.min_per_position.wicket_keeper, 1);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_roster_size_zero() {
        let tmp = fresh_dir("crease_config_roster_zero");
        fs::write(tmp.join("config").join(RULES_FILE), "[rules]\nroster_size = 0\n").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "rules.roster_size"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_minimums_larger_than_roster() {
        let mut rules = RulesConfig::default();
        rules.roster_size = 5;
        rules.min_per_position.batsman = 3;
        let err = validate(&rules).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "rules.min_per_position")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_multiplier_below_one() {
        let mut rules = RulesConfig::default();
        rules.vice_captain_multiplier = 0.5;
        let err = validate(&rules).unwrap_err();
        assert!(err.to_string().contains("rules.vice_captain_multiplier"));
    }

    #[test]
    fn rejects_non_positive_budget() {
        let mut rules = RulesConfig::default();
        rules.credit_budget = Credits::ZERO;
        assert!(validate(&rules).is_err());
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = fresh_dir("crease_config_invalid_toml");
        fs::write(tmp.join("config").join(RULES_FILE), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(RULES_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_explicit_path() {
        let err = load_rules(Path::new("/nonexistent/crease/rules.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn seed_rules_file_copies_once() {
        let tmp = std::env::temp_dir().join("crease_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults").join(RULES_FILE),
            defaults_dir.join(RULES_FILE),
        )
        .unwrap();

        let seeded = seed_rules_file(&tmp).expect("should succeed");
        assert_eq!(seeded, Some(tmp.join("config").join(RULES_FILE)));
        assert_eq!(load_config_from(&tmp).unwrap(), RulesConfig::default());

        // An existing config copy is left alone.
        fs::write(tmp.join("config").join(RULES_FILE), "# custom\n").unwrap();
        assert_eq!(seed_rules_file(&tmp).unwrap(), None);
        let content = fs::read_to_string(tmp.join("config").join(RULES_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_rules_file_without_defaults_is_noop() {
        let tmp = std::env::temp_dir().join("crease_config_no_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        assert_eq!(seed_rules_file(&tmp).unwrap(), None);
        assert!(!tmp.join("config").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_rules_file_refuses_invalid_defaults() {
        let tmp = std::env::temp_dir().join("crease_config_seed_invalid");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(RULES_FILE), "[rules]\nroster_size = 0\n").unwrap();

        let err = seed_rules_file(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }), "got {err}");
        assert!(!tmp.join("config").join(RULES_FILE).exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}
