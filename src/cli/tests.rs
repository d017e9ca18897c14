use clap::Parser;
use std::time::Duration;

use super::args::{Cli, Commands};
use super::commands::{format_detail, format_matrix, format_overview};
use crate::{InMemoryStore, Portfolio};
use phaseboard_utils::test_support::sample_portfolio;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("phaseboard").chain(args.iter().copied())).unwrap()
}

fn portfolio() -> Portfolio<InMemoryStore> {
    Portfolio::new(
        InMemoryStore::from_records(sample_portfolio()),
        Duration::from_secs(60),
    )
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["summary", "--json", "--store", "data.json", "--cache-ttl", "0", "-v"]);
    assert_eq!(cli.store.as_deref(), Some("data.json"));
    assert_eq!(cli.cache_ttl, Some(0));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Summary { json: true }));
}

#[test]
fn test_create_collects_repeated_statuses() {
    let cli = parse(&[
        "create",
        "Acme",
        "--status",
        "Inventarisatie=Voltooid",
        "--status",
        "Training=Start",
    ]);
    match cli.command {
        Commands::Create { name, statuses } => {
            assert_eq!(name, "Acme");
            assert_eq!(statuses, vec!["Inventarisatie=Voltooid", "Training=Start"]);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_set_takes_labels_with_spaces() {
    let cli = parse(&["set", "Acme", "Acceptatietest (UAT)", "Nog niet gestart"]);
    assert_eq!(cli.command.name(), "set");
    match cli.command {
        Commands::Set { phase, status, .. } => {
            assert_eq!(phase, "Acceptatietest (UAT)");
            assert_eq!(status, "Nog niet gestart");
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["phaseboard"]).is_err());
    assert!(Cli::try_parse_from(["phaseboard", "set", "Acme"]).is_err());
}

#[test]
fn test_format_overview_lists_projects_and_total() {
    let text = format_overview(&portfolio().overview().unwrap());
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("Project"));
    assert!(lines[1].starts_with("Acme") && lines[1].ends_with("75%"));
    assert!(lines[2].starts_with("Globex") && lines[2].ends_with("32%"));
    assert!(text.contains("3 project(s), overall progress 38%"));
}

#[test]
fn test_format_matrix_marks_missing_cells() {
    let matrix = portfolio().matrix(Some("Acme")).unwrap();
    let text = format_matrix(&matrix);
    assert_eq!(
        text,
        "Project  Inventarisatie  Configuratie\nAcme     Voltooid        Bezig\n"
    );

    let full = format_matrix(&portfolio().matrix(None).unwrap());
    let acme = full.lines().nth(1).unwrap();
    assert!(acme.contains(" - "));
}

#[test]
fn test_format_detail_skips_empty_buckets() {
    let detail = portfolio().project_detail("Acme").unwrap();
    let text = format_detail(&detail);
    assert!(text.contains("Progress: 75%"));
    assert!(text.contains("Voltooid: 1"));
    assert!(!text.contains("Start: 0"));
}
