use std::fmt;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `PhaseboardError` is the primary error type returned by phaseboard library
/// operations. It provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `Validation` | Write-path input outside the phase/status catalog |
/// | `DuplicateKey` | Data integrity: two records for one project/phase cell |
/// | `Store` | Record store read/write failures |
/// | `Export` | Spreadsheet rendering failures |
///
/// # Exit Code Mapping
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit codes.
///
/// Library code returns `PhaseboardError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum PhaseboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data integrity error: {0}")]
    DuplicateKey(#[from] DuplicateKeyError),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Export failed: {reason}")]
    Export { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    DataIntegrity,
    Storage,
    Export,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Validation => write!(f, "Validation"),
            Self::DataIntegrity => write!(f, "Data Integrity"),
            Self::Storage => write!(f, "Storage"),
            Self::Export => write!(f, "Export"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(msg) => format!("The configuration file is invalid: {msg}"),
            Self::InvalidValue { key, value } => {
                format!("Configuration key '{key}' has an invalid value: {value}")
            }
            Self::NotFound { path } => format!("No configuration file exists at {path}"),
            Self::DiscoveryFailed { reason } => {
                format!("Could not locate configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) | Self::InvalidValue { .. } => Some(
                "Configuration is read from .phaseboard/config.toml, searched upward from the current directory."
                    .to_string(),
            ),
            Self::NotFound { .. } => {
                Some("An explicit --config path must point at an existing file.".to_string())
            }
            Self::DiscoveryFailed { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Run 'phaseboard config' to see the effective configuration".to_string(),
            ],
            Self::InvalidValue { key, .. } => vec![format!(
                "Correct or remove '{key}' in the configuration file to fall back to its default"
            )],
            Self::NotFound { .. } => vec![
                "Verify the --config path".to_string(),
                "Omit --config to use discovery".to_string(),
            ],
            Self::DiscoveryFailed { .. } => {
                vec!["Set PHASEBOARD_HOME to the directory holding config.toml".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Write-path validation errors.
///
/// The read path never raises these: unknown statuses score zero and unknown
/// phases are carried through as extra matrix columns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project name must not be empty")]
    EmptyProject,

    #[error("unknown phase '{phase}'")]
    UnknownPhase { phase: String },

    #[error("unknown status '{status}'")]
    UnknownStatus { status: String },

    #[error("invalid assignment '{input}', expected PHASE=STATUS")]
    MalformedAssignment { input: String },
}

impl UserFriendlyError for ValidationError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::UnknownPhase { .. } => Some(
                "Phases: Inventarisatie, Configuratie, Acceptatietest (UAT), Training, Go-Live"
                    .to_string(),
            ),
            Self::UnknownStatus { .. } => {
                Some("Statuses: Nog niet gestart, Start, Bezig, Voltooid".to_string())
            }
            Self::EmptyProject | Self::MalformedAssignment { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyProject => vec!["Provide a non-empty project name".to_string()],
            Self::UnknownPhase { .. } | Self::UnknownStatus { .. } => {
                vec!["Labels are case-sensitive; quote labels containing spaces".to_string()]
            }
            Self::MalformedAssignment { .. } => {
                vec!["Use --status \"Training=Bezig\"".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Two records claim the same `(project, phase)` cell of a matrix.
///
/// This signals a broken uniqueness invariant in the record store. It is
/// never resolved silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "duplicate record for project '{project}' phase '{phase}' (statuses '{first_status}' and '{second_status}')"
)]
pub struct DuplicateKeyError {
    pub project: String,
    pub phase: String,
    pub first_status: String,
    pub second_status: String,
}

impl UserFriendlyError for DuplicateKeyError {
    fn user_message(&self) -> String {
        format!(
            "Project '{}' has more than one record for phase '{}'",
            self.project, self.phase
        )
    }

    fn context(&self) -> Option<String> {
        Some(format!(
            "Conflicting statuses: '{}' and '{}'",
            self.first_status, self.second_status
        ))
    }

    fn suggestions(&self) -> Vec<String> {
        vec![format!(
            "Run 'phaseboard set \"{}\" \"{}\" <STATUS>' to collapse the duplicates into one record",
            self.project, self.phase
        )]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::DataIntegrity
    }
}

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("project '{project}' not found")]
    ProjectNotFound { project: String },

    #[error("project '{project}' already exists")]
    ProjectExists { project: String },

    #[error("failed to read records from {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to write records to {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

impl UserFriendlyError for StoreError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ReadFailed { .. } => {
                Some("The record file must be a JSON array of records.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotFound { .. } => {
                vec!["Run 'phaseboard projects' to list existing projects".to_string()]
            }
            Self::ProjectExists { .. } => {
                vec!["Choose another name or update the existing project".to_string()]
            }
            Self::ReadFailed { .. } | Self::WriteFailed { .. } => vec![
                "Check the [store] path in the configuration".to_string(),
                "Check file permissions".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

/// Non-fatal signal that an operation ran over an empty record set.
///
/// Operations still return empty-but-valid results; the warning is only
/// logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyInputWarning {
    pub operation: &'static str,
}

impl fmt::Display for EmptyInputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} received no progress records", self.operation)
    }
}

impl UserFriendlyError for PhaseboardError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Validation(e) => e.user_message(),
            Self::DuplicateKey(e) => e.user_message(),
            Self::Store(e) => e.user_message(),
            Self::Export { reason } => format!("Could not build the spreadsheet: {reason}"),
            Self::Io(e) => format!("File system operation failed: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Validation(e) => e.context(),
            Self::DuplicateKey(e) => e.context(),
            Self::Store(e) => e.context(),
            Self::Export { .. } | Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Validation(e) => e.suggestions(),
            Self::DuplicateKey(e) => e.suggestions(),
            Self::Store(e) => e.suggestions(),
            Self::Export { .. } => vec!["Check the [export] section of the configuration".to_string()],
            Self::Io(_) => vec!["Check that the target directory exists and is writable".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Validation(e) => e.category(),
            Self::DuplicateKey(e) => e.category(),
            Self::Store(e) => e.category(),
            Self::Export { .. } => ErrorCategory::Export,
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl PhaseboardError {
    /// Format the error for end users: message, context and suggestions.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut out = format!("✗ [{}] {}", self.category(), self.user_message());
        if let Some(context) = self.context() {
            out.push_str(&format!("\n  {context}"));
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                out.push_str(&format!("\n  • {suggestion}"));
            }
        }
        out
    }

    /// Map the error to the CLI exit code table.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) => ExitCode::CONFIG,
            Self::Validation(_) => ExitCode::VALIDATION,
            Self::DuplicateKey(_) => ExitCode::DATA_INTEGRITY,
            Self::Store(_) => ExitCode::STORE,
            Self::Export { .. } | Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}
