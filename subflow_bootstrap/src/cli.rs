// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse_cli()             │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Validated CLI configuration
///
/// Holds all CLI arguments after security validation: paths canonicalized,
/// numeric values range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

/// Validated command variants, one per [`Commands`] subcommand.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    /// `subflow db_migrate`
    DbMigrate,

    /// `subflow gc_blobs`
    GcBlobs { limit: Option<u64>, dry_run: bool },

    /// `subflow cleanup_orphan_artifacts`
    CleanupOrphanArtifacts { dry_run: bool },

    /// `subflow run_local_pipeline`
    RunLocalPipeline {
        media: PathBuf,
        from_stage: Option<String>,
        max_duration_s: Option<u64>,
    },

    /// `subflow worker`
    Worker,
}

/// Parse and validate CLI arguments
///
/// 1. Parse CLI with clap
/// 2. Validate all paths with `SecureArgParser`
/// 3. Validate all numeric values
/// 4. Return `ValidatedCli` on success
///
/// # Errors
///
/// Returns `ParseError` if any validation fails
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

/// Validate parsed CLI arguments
///
/// Applies security validation to all CLI arguments: path canonicalization,
/// numeric range checks, string pattern validation.
///
/// # Errors
///
/// Returns `ParseError` if any validation fails
fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = if let Some(ref path) = cli.config {
        SecureArgParser::validate_argument(&path.to_string_lossy())?;
        Some(path.clone())
    } else {
        None
    };

    let command = match cli.command {
        Commands::DbMigrate => ValidatedCommand::DbMigrate,

        Commands::GcBlobs { limit, dry_run } => {
            if let Some(limit) = limit {
                if limit == 0 {
                    return Err(ParseError::InvalidValue {
                        arg: "limit".to_string(),
                        reason: "must be greater than 0".to_string(),
                    });
                }
            }
            ValidatedCommand::GcBlobs { limit, dry_run }
        }

        Commands::CleanupOrphanArtifacts { dry_run } => ValidatedCommand::CleanupOrphanArtifacts { dry_run },

        Commands::RunLocalPipeline {
            media,
            from_stage,
            max_duration_s,
        } => {
            let validated_media = SecureArgParser::validate_path(&media.to_string_lossy())?;

            if let Some(ref stage) = from_stage {
                SecureArgParser::validate_argument(stage)?;
            }

            if let Some(max_duration_s) = max_duration_s {
                if max_duration_s == 0 {
                    return Err(ParseError::InvalidValue {
                        arg: "max-duration-s".to_string(),
                        reason: "must be greater than 0".to_string(),
                    });
                }
            }

            ValidatedCommand::RunLocalPipeline {
                media: validated_media,
                from_stage,
                max_duration_s,
            }
        }

        Commands::Worker => ValidatedCommand::Worker,
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
    })
}
