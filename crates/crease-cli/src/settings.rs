// Locating the rules file for a CLI run.

use std::path::Path;

use anyhow::Context;
use crease_core::config::{self, RulesConfig, RULES_FILE};
use directories::ProjectDirs;
use tracing::{debug, info};

/// Resolve the rules for this run.
///
/// Search order:
/// 1. `--config-dir` (the file must exist there)
/// 2. `./config/rules.toml`, after copying missing files from `./defaults/`
/// 3. `rules.toml` in the platform config directory
/// 4. built-in defaults
pub fn resolve_rules(config_dir: Option<&Path>) -> anyhow::Result<RulesConfig> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let user_dir = ProjectDirs::from("", "", "crease").map(|d| d.config_dir().to_path_buf());
    resolve_rules_in(config_dir, &cwd, user_dir.as_deref())
}

pub(crate) fn resolve_rules_in(
    config_dir: Option<&Path>,
    cwd: &Path,
    user_dir: Option<&Path>,
) -> anyhow::Result<RulesConfig> {
    if let Some(dir) = config_dir {
        let path = dir.join(RULES_FILE);
        info!("Loading rules from {}", path.display());
        return config::load_rules(&path)
            .with_context(|| format!("failed to load rules from {}", path.display()));
    }

    if let Some(path) = config::seed_rules_file(cwd).context("failed to initialize config/")? {
        info!("Copied default rules to {}", path.display());
    }
    if cwd.join("config").join(RULES_FILE).exists() {
        debug!("Loading rules from ./config");
        return config::load_config_from(cwd).context("failed to load ./config/rules.toml");
    }

    if let Some(dir) = user_dir {
        let path = dir.join(RULES_FILE);
        if path.exists() {
            info!("Loading rules from {}", path.display());
            return config::load_rules(&path)
                .with_context(|| format!("failed to load rules from {}", path.display()));
        }
    }

    debug!("No rules file found, using built-in rules");
    Ok(RulesConfig::default())
}
