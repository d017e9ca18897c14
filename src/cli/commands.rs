//! Command implementations
//!
//! Each `execute_*` function prints its own output. Table formatting lives in
//! plain functions so it can be tested without capturing stdout.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::Serialize;
use std::collections::BTreeMap;

use phaseboard_utils::atomic_write::write_bytes_atomic;

use crate::{
    Config, PhaseboardError, Portfolio, PortfolioOverview, ProgressRecordStore, ProjectDetail,
    ProjectMatrix, emit_jcs, parse_assignment,
};

/// Placeholder for matrix cells without a record.
const EMPTY_CELL: &str = "-";

pub fn execute_summary_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    json: bool,
) -> Result<()> {
    let overview = portfolio.overview()?;
    if json {
        println!("{}", emit_jcs(&overview)?);
    } else {
        print!("{}", format_overview(&overview));
    }
    Ok(())
}

pub fn execute_matrix_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    project: Option<&str>,
    json: bool,
) -> Result<()> {
    let matrix = portfolio.matrix(project)?;
    if json {
        println!("{}", emit_jcs(&matrix)?);
    } else if matrix.is_empty() {
        println!("No projects found");
    } else {
        print!("{}", format_matrix(&matrix));
    }
    Ok(())
}

pub fn execute_show_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    project: &str,
    json: bool,
) -> Result<()> {
    let detail = portfolio.project_detail(project)?;
    if json {
        println!("{}", emit_jcs(&detail)?);
    } else {
        print!("{}", format_detail(&detail));
    }
    Ok(())
}

pub fn execute_export_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    out: &str,
) -> Result<()> {
    let bytes = portfolio.export()?;
    let projects = portfolio.project_names()?.len();

    let path = Utf8PathBuf::from(out);
    write_bytes_atomic(&path, &bytes)
        .with_context(|| format!("Failed to write export to {path}"))?;

    println!("✓ Exported {projects} project(s) to {path}");
    Ok(())
}

pub fn execute_create_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    name: &str,
    assignments: &[String],
) -> Result<()> {
    let statuses = assignments
        .iter()
        .map(|input| parse_assignment(input))
        .collect::<Result<Vec<_>, _>>()
        .map_err(PhaseboardError::from)?;

    let written = portfolio.create_project(name, &statuses)?;
    println!("✓ Created project '{}' with {written} phases", name.trim());
    Ok(())
}

pub fn execute_set_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    project: &str,
    phase: &str,
    status: &str,
) -> Result<()> {
    portfolio.update_status(project, phase, status)?;
    println!("✓ {}: {phase} → {status}", project.trim());
    Ok(())
}

pub fn execute_rename_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    from: &str,
    to: &str,
) -> Result<()> {
    let moved = portfolio.rename_project(from, to)?;
    println!("✓ Renamed '{from}' to '{}' ({moved} records)", to.trim());
    Ok(())
}

pub fn execute_delete_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    name: &str,
) -> Result<()> {
    let removed = portfolio.delete_project(name)?;
    println!("✓ Deleted '{name}' ({removed} records)");
    Ok(())
}

pub fn execute_projects_command<S: ProgressRecordStore>(
    portfolio: &mut Portfolio<S>,
    json: bool,
) -> Result<()> {
    let names = portfolio.project_names()?;
    if json {
        println!("{}", emit_jcs(&names)?);
    } else if names.is_empty() {
        println!("No projects found");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigValue {
    value: String,
    source: String,
}

pub fn execute_config_command(config: &Config, json: bool) -> Result<()> {
    let effective = config.effective_config();
    if json {
        let values: BTreeMap<String, ConfigValue> = effective
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigValue { value, source }))
            .collect();
        println!("{}", emit_jcs(&values)?);
        return Ok(());
    }

    println!("Effective configuration:");
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        println!("  {key:<width$}  {value}  ({source})");
    }
    Ok(())
}

// ---- text formatting ----

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}

pub(crate) fn format_overview(overview: &PortfolioOverview) -> String {
    if overview.projects.is_empty() {
        return "No projects found\n".to_string();
    }

    let header = "Project";
    let width = overview
        .projects
        .iter()
        .map(|summary| display_width(&summary.project))
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{}  Progress\n", pad(header, width));
    for summary in &overview.projects {
        out.push_str(&format!(
            "{}  {:>7}%\n",
            pad(&summary.project, width),
            summary.average_score
        ));
    }
    out.push_str(&format!(
        "\n{} project(s), overall progress {}%\n",
        overview.project_count, overview.overall_progress
    ));
    out
}

pub(crate) fn format_matrix(matrix: &ProjectMatrix) -> String {
    let header: Vec<&str> = std::iter::once("Project")
        .chain(matrix.columns.iter().map(String::as_str))
        .collect();
    let rows: Vec<Vec<&str>> = matrix
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.project.as_str())
                .chain(row.cells.iter().map(|cell| cell.as_deref().unwrap_or(EMPTY_CELL)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|row| display_width(row[col]))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_line = |cells: &[&str]| -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        format!("{}\n", line.join("  ").trim_end())
    };

    let mut out = render_line(&header);
    for row in &rows {
        out.push_str(&render_line(row));
    }
    out
}

pub(crate) fn format_detail(detail: &ProjectDetail) -> String {
    let mut out = format!(
        "Project: {}\nProgress: {}%\n\nPhases:\n",
        detail.project, detail.average_score
    );
    let width = detail
        .phases
        .iter()
        .map(|phase| display_width(&phase.phase))
        .max()
        .unwrap_or(0);
    for phase in &detail.phases {
        out.push_str(&format!(
            "  {}  {} ({})\n",
            pad(&phase.phase, width),
            phase.status,
            phase.score
        ));
    }

    out.push_str("\nStatus distribution:\n");
    for bucket in detail.status_distribution.iter().filter(|b| b.count > 0) {
        out.push_str(&format!("  {}: {}\n", bucket.status, bucket.count));
    }
    out
}
