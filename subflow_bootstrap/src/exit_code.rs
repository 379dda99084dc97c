// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions. The
//! operator-facing subcommands (`db_migrate`, `gc_blobs`,
//! `cleanup_orphan_artifacts`, `run_local_pipeline`, `worker`) only ever
//! surface the three codes named for them — success, configuration/usage
//! error, runtime failure — via [`map_error_to_exit_code`]; the fuller
//! taxonomy below remains available to callers that want a finer-grained
//! signal (shell scripts inspecting exit status, systemd `RestartPreventExitStatus`).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use subflow_bootstrap::exit_code::{result_to_exit_code, ExitCode};
//!
//! fn run_application() -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! fn main() {
//!     let code = result_to_exit_code(run_application());
//!     std::process::exit(code.as_i32());
//! }
//! ```

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1) — also the code for a configuration/usage error
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65)
    DataError = 65,

    /// Cannot open input (66)
    NoInput = 66,

    /// User does not exist (67)
    NoUser = 67,

    /// Host name unknown (68)
    NoHost = 68,

    /// Service unavailable (69)
    Unavailable = 69,

    /// Internal software error (70) — a stage runner or orchestrator defect
    Software = 70,

    /// System error (71)
    OsError = 71,

    /// Critical OS file missing (72)
    OsFile = 72,

    /// Cannot create output file (73)
    CantCreate = 73,

    /// I/O error (74)
    IoError = 74,

    /// Temporary failure, retry (75) — a runtime/provider failure (exit 2)
    TempFail = 75,

    /// Remote error in protocol (76)
    Protocol = 76,

    /// Permission denied (77)
    NoPerm = 77,

    /// Configuration error (78)
    Config = 78,

    /// Interrupted by signal (SIGINT) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps an error to the CLI's 3-code contract: 0 success (not
    /// reachable from here), 1 configuration/usage error, 2 runtime
    /// failure. Anything this function cannot classify as configuration
    /// falls through to runtime failure, since an operator-facing CLI
    /// should fail loud rather than silently pick "general error".
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let text = error.to_string().to_lowercase();
        if text.contains("config") || text.contains("invalid") || text.contains("usage") || text.contains("missing") {
            ExitCode::Config
        } else {
            ExitCode::TempFail
        }
    }

    /// The 3-value process exit code the CLI surface actually promises:
    /// 0, 1, or 2.
    pub fn as_cli_status(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Config | ExitCode::UsageError | ExitCode::DataError => 1,
            _ => 2,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::NoUser => "User does not exist",
            ExitCode::NoHost => "Host name unknown",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::OsFile => "Critical OS file missing",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure",
            ExitCode::Protocol => "Remote error in protocol",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Maps an `anyhow::Error` to the CLI's 3-value exit status.
pub fn map_error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    ExitCode::from_error(error.root_cause())
}

/// Runs a CLI operation's result through [`map_error_to_exit_code`],
/// logging the error chain on failure.
pub fn result_to_exit_code<T>(result: anyhow::Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::Success,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            map_error_to_exit_code(&err)
        }
    }
}
