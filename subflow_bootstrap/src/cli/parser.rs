// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap.
//!
//! This module defines the CLI structure and handles argument parsing.
//! Security validation happens in the validator module after parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser, Debug, Clone)]
#[command(name = "subflow")]
#[command(about = concat!("SubFlow bilingual subtitle pipeline v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run pending sqlx migrations against the configured database.
    DbMigrate,

    /// Sweep unreferenced blobs out of the blob store.
    GcBlobs {
        /// Maximum number of blobs to delete in this pass.
        #[arg(long)]
        limit: Option<u64>,

        /// Report what would be deleted without deleting anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove artifacts in the artifact store with no matching stage run.
    CleanupOrphanArtifacts {
        /// Report what would be removed without removing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the full pipeline against a local media file, in-process.
    RunLocalPipeline {
        /// Path to the source media file.
        #[arg(long)]
        media: PathBuf,

        /// Resume from a named stage instead of the first one.
        #[arg(long)]
        from_stage: Option<String>,

        /// Trim the extracted audio to at most this many seconds.
        #[arg(long)]
        max_duration_s: Option<u64>,
    },

    /// Start the task queue consumer loop.
    Worker,
}

/// Parse CLI arguments
///
/// This is the entry point for CLI parsing. It uses clap to parse
/// arguments and returns the parsed CLI structure.
///
/// # Panics
///
/// Clap will exit the process with appropriate error message if parsing fails
pub fn parse_cli() -> Cli {
    Cli::parse()
}
