//! Spreadsheet rendering of the project matrix.
//!
//! The export is a fixed-schema document: one project column, the catalog
//! phases in catalog order and a trailing `Progress %` column. Phases outside
//! the catalog are left out of the export even though [`MatrixBuilder::to_matrix`]
//! carries them.

use std::collections::HashMap;

use rust_xlsxwriter::{Color, DocProperties, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, info};

use phaseboard_config::Config;
use phaseboard_config::config::{
    DEFAULT_HEADER_FILL, DEFAULT_PHASE_COLUMN_WIDTH, DEFAULT_PROGRESS_COLUMN_WIDTH,
    DEFAULT_PROJECT_COLUMN_WIDTH, DEFAULT_PROJECT_HEADER, DEFAULT_SHEET_NAME,
};
use phaseboard_utils::error::PhaseboardError;
use phaseboard_utils::logging::engine_span;
use phaseboard_utils::types::{Phase, ProgressRecord};

use crate::matrix::MatrixBuilder;

/// Header label of the trailing average-score column.
pub const PROGRESS_HEADER: &str = "Progress %";

const DOCUMENT_TITLE: &str = "Projectvoortgang";

/// Layout settings for [`ReportExporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub sheet_name: String,
    pub project_header: String,
    /// Header background as packed `0xRRGGBB`.
    pub header_fill: u32,
    pub project_column_width: f64,
    pub phase_column_width: f64,
    pub progress_column_width: f64,
}

impl ExportOptions {
    /// Take the `[export]` settings from a validated configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            sheet_name: config.sheet_name().to_string(),
            project_header: config.project_header().to_string(),
            header_fill: config.header_fill_rgb(),
            project_column_width: config.project_column_width(),
            phase_column_width: config.phase_column_width(),
            progress_column_width: config.progress_column_width(),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            project_header: DEFAULT_PROJECT_HEADER.to_string(),
            header_fill: u32::from_str_radix(DEFAULT_HEADER_FILL.trim_start_matches('#'), 16)
                .unwrap_or(0x1F4E78),
            project_column_width: DEFAULT_PROJECT_COLUMN_WIDTH,
            phase_column_width: DEFAULT_PHASE_COLUMN_WIDTH,
            progress_column_width: DEFAULT_PROGRESS_COLUMN_WIDTH,
        }
    }
}

/// Renders progress records into an `.xlsx` workbook held in memory.
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    options: ExportOptions,
}

impl ReportExporter {
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Header row of every export: project label, catalog phases, `Progress %`.
    #[must_use]
    pub fn header_row(&self) -> Vec<String> {
        std::iter::once(self.options.project_header.clone())
            .chain(Phase::ALL.iter().map(|phase| phase.as_str().to_string()))
            .chain(std::iter::once(PROGRESS_HEADER.to_string()))
            .collect()
    }

    /// Render `records` to workbook bytes.
    ///
    /// An empty record set yields a workbook with the header row only. The
    /// bytes are returned to the caller; nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseboardError::DuplicateKey`] when the records break the
    /// one-record-per-cell invariant and [`PhaseboardError::Export`] when the
    /// workbook cannot be assembled.
    pub fn render(&self, records: &[ProgressRecord]) -> Result<Vec<u8>, PhaseboardError> {
        let _span = engine_span("render", records.len()).entered();

        let matrix = MatrixBuilder::to_matrix(records, None)?;
        let progress: HashMap<String, u8> = MatrixBuilder::summarize(records)
            .into_iter()
            .map(|summary| (summary.project, summary.average_score))
            .collect();

        let mut workbook = Workbook::new();
        workbook.set_properties(&DocProperties::new().set_title(DOCUMENT_TITLE));

        let worksheet = workbook.add_worksheet();
        self.write_layout(worksheet).map_err(export_error)?;

        for (idx, row) in matrix.rows.iter().enumerate() {
            let sheet_row = u32::try_from(idx + 1).map_err(|_| PhaseboardError::Export {
                reason: format!("too many rows ({})", matrix.rows.len()),
            })?;

            worksheet
                .write_string(sheet_row, 0, &row.project)
                .map_err(export_error)?;
            for (col, phase) in (1u16..).zip(Phase::ALL) {
                if let Some(status) = matrix.cell(&row.project, phase.as_str()) {
                    worksheet
                        .write_string(sheet_row, col, status)
                        .map_err(export_error)?;
                }
            }
            // Joined by project name, not by row position.
            if let Some(score) = progress.get(&row.project) {
                worksheet
                    .write_number(sheet_row, progress_column(), f64::from(*score))
                    .map_err(export_error)?;
            }
        }

        let bytes = workbook.save_to_buffer().map_err(export_error)?;
        debug!(bytes = bytes.len(), "Rendered workbook");
        info!(
            projects = matrix.rows.len(),
            sheet = %self.options.sheet_name,
            "Exported portfolio"
        );
        Ok(bytes)
    }

    fn write_layout(&self, worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        worksheet.set_name(&self.options.sheet_name)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(self.options.header_fill))
            .set_border(FormatBorder::Thin);

        for (col, label) in (0u16..).zip(self.header_row()) {
            worksheet.write_string_with_format(0, col, &label, &header_format)?;
        }

        worksheet.set_column_width(0, self.options.project_column_width)?;
        for col in 1..progress_column() {
            worksheet.set_column_width(col, self.options.phase_column_width)?;
        }
        worksheet.set_column_width(progress_column(), self.options.progress_column_width)?;
        worksheet.set_freeze_panes(1, 1)?;
        Ok(())
    }
}

/// Render with the default layout.
///
/// # Errors
///
/// See [`ReportExporter::render`].
pub fn render(records: &[ProgressRecord]) -> Result<Vec<u8>, PhaseboardError> {
    ReportExporter::default().render(records)
}

fn progress_column() -> u16 {
    // Project column, one column per catalog phase, then Progress %.
    1 + Phase::ALL.len() as u16
}

fn export_error(err: XlsxError) -> PhaseboardError {
    PhaseboardError::Export {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use phaseboard_utils::test_support::{record, sample_portfolio};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_header_row_layout() {
        assert_eq!(
            ReportExporter::default().header_row(),
            vec![
                "Project",
                "Inventarisatie",
                "Configuratie",
                "Acceptatietest (UAT)",
                "Training",
                "Go-Live",
                "Progress %"
            ]
        );
    }

    #[test]
    fn test_empty_records_render_header_only() {
        let bytes = render(&[]).unwrap();
        assert!(!bytes.is_empty());

        let rows = read_back(bytes, DEFAULT_SHEET_NAME);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], ReportExporter::default().header_row());
    }

    #[test]
    fn test_rows_join_progress_by_project() {
        let rows = read_back(render(&sample_portfolio()).unwrap(), DEFAULT_SHEET_NAME);
        assert_eq!(rows.len(), 4);

        assert_eq!(
            rows[1],
            vec!["Acme", "Voltooid", "Bezig", "", "", "", "75"]
        );
        assert_eq!(rows[2][0], "Globex");
        assert_eq!(rows[2][6], "32");
        assert_eq!(rows[3][0], "Initech");
        assert_eq!(rows[3][4], "Afgerond");
        assert_eq!(rows[3][6], "0");
    }

    #[test]
    fn test_unknown_phases_are_dropped_from_export() {
        let records = vec![
            record("Acme", "Nazorg", "Voltooid"),
            record("Acme", "Training", "Bezig"),
        ];
        let rows = read_back(render(&records).unwrap(), DEFAULT_SHEET_NAME);
        assert_eq!(rows[0].len(), 7);
        assert!(!rows.iter().flatten().any(|cell| cell == "Nazorg"));
        // Progress still averages over every record of the project.
        assert_eq!(rows[1][6], "75");
    }

    #[test]
    fn test_duplicate_records_fail_export() {
        let records = vec![
            record("Acme", "Training", "Bezig"),
            record("Acme", "Training", "Voltooid"),
        ];
        assert!(matches!(
            render(&records),
            Err(PhaseboardError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_custom_options_apply() {
        let exporter = ReportExporter::new(ExportOptions {
            sheet_name: "Portfolio".to_string(),
            project_header: "Klant".to_string(),
            ..ExportOptions::default()
        });
        let rows = read_back(exporter.render(&sample_portfolio()).unwrap(), "Portfolio");
        assert_eq!(rows[0][0], "Klant");
    }

    #[test]
    fn test_options_from_config() {
        let config = Config::builder()
            .sheet_name("Q4")
            .header_fill("#000000")
            .build()
            .unwrap();
        let options = ExportOptions::from_config(&config);
        assert_eq!(options.sheet_name, "Q4");
        assert_eq!(options.header_fill, 0);
        assert_eq!(options, ExportOptions {
            sheet_name: "Q4".to_string(),
            header_fill: 0,
            ..ExportOptions::default()
        });
    }

    #[test]
    fn test_invalid_sheet_name_is_an_export_error() {
        let exporter = ReportExporter::new(ExportOptions {
            sheet_name: "a/b".to_string(),
            ..ExportOptions::default()
        });
        assert!(matches!(
            exporter.render(&[]),
            Err(PhaseboardError::Export { .. })
        ));
    }
}
