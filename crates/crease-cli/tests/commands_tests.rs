// Integration tests for the crease subcommands, driven through `commands::run`
// with fixture files and an in-memory output buffer.

use std::path::PathBuf;

use crease_cli::cli::Command;
use crease_cli::commands::{self, run};
use crease_core::{Credits, PlayerPool, RulesConfig};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run_json(command: Command) -> (bool, serde_json::Value) {
    let mut out = Vec::new();
    let ok = run(&command, &RulesConfig::default(), &mut out).expect("command should run");
    let value = serde_json::from_slice(&out).expect("output should be JSON");
    (ok, value)
}

fn picks(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

const FULL_TEAM: [&str; 11] = [
    "ind-wk1", "ind-bat1", "aus-bat1", "ind-bat3", "aus-bat3", "ind-ar2", "aus-ar2", "ind-bowl1",
    "ind-bowl3", "aus-bowl1", "aus-bowl3",
];

#[test]
fn check_accepts_saved_team() {
    let (ok, report) = run_json(Command::Check {
        pool: fixture("match_pool.json"),
        team: fixture("saved_team.json"),
    });
    assert!(ok);
    assert_eq!(report["valid"], true);
    assert!(report["error"].is_null());
    assert_eq!(report["summary"]["creditsUsed"], 98.5);
    assert_eq!(report["summary"]["creditsRemaining"], 1.5);
    assert_eq!(report["summary"]["captainId"], "ind-bat1");
    assert_eq!(report["summary"]["validation"]["isValid"], true);
}

#[test]
fn check_rejects_same_player_as_both_leaders() {
    let (ok, report) = run_json(Command::Check {
        pool: fixture("match_pool.json"),
        team: fixture("saved_team_same_leader.json"),
    });
    assert!(!ok);
    assert_eq!(report["valid"], false);
    assert!(report["summary"].is_null());
    assert_eq!(report["error"], "ind-bat1 cannot be both captain and vice-captain");
}

#[test]
fn check_without_vice_captain_is_an_invalid_team_file() {
    let mut out = Vec::new();
    let err = run(
        &Command::Check {
            pool: fixture("match_pool.json"),
            team: fixture("saved_team_no_vice.json"),
        },
        &RulesConfig::default(),
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid team file"), "got {err:#}");
    assert!(format!("{err:#}").contains("viceCaptainId"), "got {err:#}");
    assert!(out.is_empty());
}

#[test]
fn build_prints_payload_for_complete_team() {
    let (ok, report) = run_json(Command::Build {
        pool: fixture("match_pool.json"),
        picks: picks(&FULL_TEAM),
        captain: Some("aus-bat1".into()),
        vice_captain: Some("ind-ar2".into()),
    });
    assert!(ok);
    assert_eq!(report["rejected"], serde_json::json!([]));
    assert_eq!(report["payload"]["players"].as_array().unwrap().len(), 11);
    assert_eq!(report["payload"]["captainId"], "aus-bat1");
    assert_eq!(report["payload"]["viceCaptainId"], "ind-ar2");
}

#[test]
fn build_reports_rejections_and_missing_positions() {
    let (ok, report) = run_json(Command::Build {
        pool: fixture("match_pool.json"),
        picks: picks(&["ind-bat1", "ind-bat1", "nobody", "aus-bowl1"]),
        captain: Some("ind-wk1".into()),
        vice_captain: None,
    });
    assert!(!ok);

    let rejected = report["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 3);
    assert_eq!(rejected[0]["playerId"], "ind-bat1");
    assert_eq!(rejected[0]["reason"], "ind-bat1 is already in your team");
    assert_eq!(rejected[1]["reason"], "nobody is not in the player pool");
    assert_eq!(rejected[2]["reason"], "ind-wk1 is not in your team");

    assert!(report["payload"].is_null());
    assert_eq!(
        report["error"],
        "team is incomplete, still need: 9 more players, 1 Wicket-Keeper, 1 All-Rounder"
    );
}

#[test]
fn options_lists_only_keepers_for_last_slot() {
    // 10 players without a keeper: only keepers remain selectable.
    let ten = [
        "ind-bat1", "aus-bat1", "ind-bat3", "aus-bat3", "ind-ar2", "aus-ar2", "ind-bowl1",
        "ind-bowl3", "aus-bowl3", "ind-bowl2",
    ];
    let (ok, report) = run_json(Command::Options {
        pool: fixture("match_pool.json"),
        picks: picks(&ten),
    });
    assert!(ok);
    assert_eq!(report["remainingSlots"], 1);

    let players = report["players"].as_array().unwrap();
    assert!(!players.is_empty());
    assert!(players.iter().all(|p| p["position"] == "wicket-keeper"));

    let positions = report["positions"].as_array().unwrap();
    assert_eq!(positions[0]["position"], "wicket-keeper");
    assert_eq!(positions[0]["stillRequired"], 1);
    assert_eq!(positions[0]["selectable"], true);
    assert_eq!(positions[1]["selectable"], false);
}

#[test]
fn options_reports_team_names() {
    let pool = PlayerPool::load(&fixture("match_pool.json"), Credits::from_whole(8)).unwrap();
    let report = commands::options(&RulesConfig::default(), &pool, &[]);
    assert_eq!(report.players.len(), pool.len());
    assert_eq!(report.credits_remaining, Credits::from_whole(100));
    assert!(report.players.iter().any(|p| p.team == "Australia"));
}

#[test]
fn missing_pool_file_is_an_error() {
    let mut out = Vec::new();
    let err = run(
        &Command::Options {
            pool: fixture("no_such_pool.json"),
            picks: vec![],
        },
        &RulesConfig::default(),
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to load player pool"));
    assert!(out.is_empty());
}
