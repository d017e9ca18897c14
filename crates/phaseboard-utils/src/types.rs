use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Delivery phases of a client implementation project.
///
/// `Phase` is the closed catalog of phases a project moves through. The
/// declaration order is the chronological order used for dashboard columns
/// and export columns alike.
///
/// # Phase Order
///
/// ```text
/// Inventarisatie → Configuratie → Acceptatietest (UAT) → Training → Go-Live
/// ```
///
/// # Example
///
/// ```rust
/// use phaseboard_utils::types::Phase;
///
/// let phase = Phase::parse("Go-Live").unwrap();
/// assert_eq!(phase, Phase::GoLive);
/// assert_eq!(phase.as_str(), "Go-Live");
/// assert!(Phase::Inventory < Phase::GoLive);
/// ```
///
/// # Serialization
///
/// `Phase` serializes to its display label (e.g. `"Acceptatietest (UAT)"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Inventory of the client's current situation.
    #[serde(rename = "Inventarisatie")]
    Inventory,
    /// System configuration.
    #[serde(rename = "Configuratie")]
    Configuration,
    /// User acceptance testing.
    #[serde(rename = "Acceptatietest (UAT)")]
    AcceptanceTest,
    /// End-user training.
    #[serde(rename = "Training")]
    Training,
    /// Production go-live.
    #[serde(rename = "Go-Live")]
    GoLive,
}

impl Phase {
    /// Every phase in catalog order.
    pub const ALL: [Phase; 5] = [
        Self::Inventory,
        Self::Configuration,
        Self::AcceptanceTest,
        Self::Training,
        Self::GoLive,
    ];

    /// Returns the label used in stored records, columns and exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "Inventarisatie",
            Self::Configuration => "Configuratie",
            Self::AcceptanceTest => "Acceptatietest (UAT)",
            Self::Training => "Training",
            Self::GoLive => "Go-Live",
        }
    }

    /// Zero-based position of the phase in the catalog.
    #[must_use]
    pub const fn position(&self) -> usize {
        *self as usize
    }

    /// Parse a stored phase label. Matching is exact.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.as_str() == label)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative completion state of one project phase.
///
/// Variants are declared in ascending progress order, so `Ord` follows
/// `Nog niet gestart < Start < Bezig < Voltooid`. Each status carries its
/// progress score and its display colour.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Status {
    #[default]
    #[serde(rename = "Nog niet gestart")]
    NotStarted,
    #[serde(rename = "Start")]
    Started,
    #[serde(rename = "Bezig")]
    InProgress,
    #[serde(rename = "Voltooid")]
    Completed,
}

impl Status {
    /// Every status in ascending progress order.
    pub const ALL: [Status; 4] = [
        Self::NotStarted,
        Self::Started,
        Self::InProgress,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Nog niet gestart",
            Self::Started => "Start",
            Self::InProgress => "Bezig",
            Self::Completed => "Voltooid",
        }
    }

    /// Progress score in `0..=100`.
    #[must_use]
    pub const fn score(&self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Started => 10,
            Self::InProgress => 50,
            Self::Completed => 100,
        }
    }

    /// Display colour used by dashboards for status distributions.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::NotStarted => "red",
            Self::Started => "gold",
            Self::InProgress => "orange",
            Self::Completed => "green",
        }
    }

    /// Parse a stored status label. Matching is exact.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(project, phase, status)` row as delivered by a record store.
///
/// Phase and status are kept as the raw stored strings: historical data may
/// hold labels outside the catalog, and the read path has to tolerate them.
/// Use [`ProgressRecord::validated`] on the write path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub project: String,
    pub phase: String,
    pub status: String,
}

impl ProgressRecord {
    /// Build a record without validation.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        phase: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            phase: phase.into(),
            status: status.into(),
        }
    }

    /// Build a record from catalog values.
    #[must_use]
    pub fn from_parts(project: impl Into<String>, phase: Phase, status: Status) -> Self {
        Self::new(project, phase.as_str(), status.as_str())
    }

    /// Build a record for the write path, rejecting empty project names and
    /// labels outside the catalog.
    pub fn validated(project: &str, phase: &str, status: &str) -> Result<Self, ValidationError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(ValidationError::EmptyProject);
        }
        let phase = Phase::parse(phase).ok_or_else(|| ValidationError::UnknownPhase {
            phase: phase.to_string(),
        })?;
        let status = Status::parse(status).ok_or_else(|| ValidationError::UnknownStatus {
            status: status.to_string(),
        })?;
        Ok(Self::from_parts(project, phase, status))
    }

    /// Catalog phase of this record, if the label is known.
    #[must_use]
    pub fn phase_id(&self) -> Option<Phase> {
        Phase::parse(&self.phase)
    }

    /// Catalog status of this record, if the label is known.
    #[must_use]
    pub fn status_id(&self) -> Option<Status> {
        Status::parse(&self.status)
    }

    /// Uniqueness key of the record.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.project, &self.phase)
    }
}

/// Derived per-project progress. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project: String,
    /// Rounded mean score over the phases that have a record.
    pub average_score: u8,
}

/// Source of a configuration value, used for attribution in `phaseboard config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}
