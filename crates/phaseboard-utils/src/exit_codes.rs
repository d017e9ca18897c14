//! Exit code constants for phaseboard.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CONFIG` | Invalid CLI arguments or configuration |
//! | 3 | `VALIDATION` | Phase/status/project input rejected |
//! | 4 | `DATA_INTEGRITY` | Duplicate records for one project/phase |
//! | 5 | `STORE` | Record store read/write failure |

/// Exit codes matching the documented exit code table.
///
/// The numeric values are part of the public API and will not change in 1.x
/// releases.
///
/// # Example
///
/// ```rust
/// use phaseboard_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::DATA_INTEGRITY, ExitCode::from_i32(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Configuration or CLI argument error
    pub const CONFIG: ExitCode = ExitCode(2);

    /// Write-path validation rejected the input
    pub const VALIDATION: ExitCode = ExitCode(3);

    /// Record set violates the one-record-per-cell invariant
    pub const DATA_INTEGRITY: ExitCode = ExitCode(4);

    /// Record store could not be read or written
    pub const STORE: ExitCode = ExitCode(5);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
