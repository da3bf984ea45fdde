// Subcommand implementations. Each produces a serializable report; `run`
// loads the pool, dispatches, and writes the report as JSON.

use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use crease_core::draft::builder::DraftSummary;
use crease_core::draft::rules;
use crease_core::{Credits, PlayerPool, Position, RulesConfig, TeamBuilder, TeamPayload, TeamSide};

use crate::cli::Command;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A pick or leadership choice the builder refused.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub player_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub valid: bool,
    pub summary: Option<DraftSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub rejected: Vec<Rejection>,
    pub summary: DraftSummary,
    pub payload: Option<TeamPayload>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStatus {
    pub position: Position,
    pub selected: usize,
    pub still_required: usize,
    pub selectable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub fantasy_price: Credits,
    pub team: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsReport {
    pub rejected: Vec<Rejection>,
    pub credits_remaining: Credits,
    pub remaining_slots: usize,
    pub positions: Vec<PositionStatus>,
    pub players: Vec<OptionEntry>,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Re-open a saved team and see whether it can be saved unchanged.
pub fn check(rules: &RulesConfig, pool: &PlayerPool, payload: &TeamPayload) -> CheckReport {
    let builder = match TeamBuilder::from_payload(rules.clone(), pool, payload) {
        Ok(b) => b,
        Err(e) => {
            warn!("saved team cannot be re-opened: {}", e);
            return CheckReport {
                valid: false,
                summary: None,
                error: Some(e.to_string()),
            };
        }
    };

    let finalized = builder.finalize();
    CheckReport {
        valid: finalized.is_ok(),
        summary: Some(builder.summary()),
        error: finalized.err().map(|e| e.to_string()),
    }
}

/// Apply picks in order, then the leadership choices, and try to finalize.
/// Refused picks are reported and skipped; later picks still apply.
pub fn build(
    rules: &RulesConfig,
    pool: &PlayerPool,
    picks: &[String],
    captain: Option<&str>,
    vice_captain: Option<&str>,
) -> BuildReport {
    let (mut builder, mut rejected) = apply_picks(rules, pool, picks);

    if let Some(id) = captain {
        if let Err(e) = builder.assign_captain(id) {
            warn!(player_id = id, "captain not assigned: {}", e);
            rejected.push(Rejection {
                player_id: id.to_string(),
                reason: e.to_string(),
            });
        }
    }
    if let Some(id) = vice_captain {
        if let Err(e) = builder.assign_vice_captain(id) {
            warn!(player_id = id, "vice-captain not assigned: {}", e);
            rejected.push(Rejection {
                player_id: id.to_string(),
                reason: e.to_string(),
            });
        }
    }

    let (payload, error) = match builder.finalize() {
        Ok(p) => (Some(p), None),
        Err(e) => (None, Some(e.to_string())),
    };

    BuildReport {
        rejected,
        summary: builder.summary(),
        payload,
        error,
    }
}

/// What can still be added to a partial team.
pub fn options(rules: &RulesConfig, pool: &PlayerPool, picks: &[String]) -> OptionsReport {
    let (builder, rejected) = apply_picks(rules, pool, picks);
    let draft = builder.draft();

    let counts = draft.position_counts();
    let needed = rules::still_required(draft, rules);
    let positions = Position::ALL
        .iter()
        .map(|&position| PositionStatus {
            position,
            selected: counts.get(position),
            still_required: needed.get(position),
            selectable: builder.can_select_position(position),
        })
        .collect();

    let players = builder
        .selectable(pool)
        .into_iter()
        .map(|p| OptionEntry {
            id: p.id.clone(),
            name: p.full_name(),
            position: p.position,
            fantasy_price: p.fantasy_price,
            team: team_label(pool, p.team),
        })
        .collect();

    OptionsReport {
        rejected,
        credits_remaining: builder.credits_remaining(),
        remaining_slots: rules::remaining_slots(draft, rules),
        positions,
        players,
    }
}

fn apply_picks(
    rules: &RulesConfig,
    pool: &PlayerPool,
    picks: &[String],
) -> (TeamBuilder, Vec<Rejection>) {
    let mut builder = TeamBuilder::new(rules.clone());
    let mut rejected = Vec::new();
    for id in picks {
        if let Err(e) = builder.add_by_id(pool, id) {
            warn!(player_id = %id, "pick refused: {}", e);
            rejected.push(Rejection {
                player_id: id.clone(),
                reason: e.to_string(),
            });
        }
    }
    (builder, rejected)
}

fn team_label(pool: &PlayerPool, side: TeamSide) -> String {
    let name = pool.team_name(side);
    if name.is_empty() {
        side.to_string()
    } else {
        name.to_string()
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand and write its JSON report to `out`. Returns whether the
/// command succeeded (a finalizable team for `check`/`build`).
pub fn run<W: Write>(command: &Command, rules: &RulesConfig, out: &mut W) -> anyhow::Result<bool> {
    let ok = match command {
        Command::Check { pool, team } => {
            let pool = load_pool(pool, rules)?;
            let text = std::fs::read_to_string(team)
                .with_context(|| format!("failed to read team file {}", team.display()))?;
            let payload = TeamPayload::from_json(&text)
                .with_context(|| format!("invalid team file {}", team.display()))?;
            let report = check(rules, &pool, &payload);
            write_json(out, &report)?;
            report.valid
        }
        Command::Build {
            pool,
            picks,
            captain,
            vice_captain,
        } => {
            let pool = load_pool(pool, rules)?;
            let report = build(rules, &pool, picks, captain.as_deref(), vice_captain.as_deref());
            if report.payload.is_some() {
                info!("Team complete: {} players", report.summary.players.len());
            }
            write_json(out, &report)?;
            report.payload.is_some()
        }
        Command::Options { pool, picks } => {
            let pool = load_pool(pool, rules)?;
            let report = options(rules, &pool, picks);
            write_json(out, &report)?;
            true
        }
    };
    Ok(ok)
}

fn load_pool(path: &std::path::Path, rules: &RulesConfig) -> anyhow::Result<PlayerPool> {
    let pool = PlayerPool::load(path, rules.default_player_price)
        .with_context(|| format!("failed to load player pool from {}", path.display()))?;
    info!(
        "Loaded {} players ({} vs {})",
        pool.len(),
        team_label(&pool, TeamSide::Team1),
        team_label(&pool, TeamSide::Team2)
    );
    Ok(pool)
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize report")?;
    writeln!(out).context("failed to write report")?;
    Ok(())
}
