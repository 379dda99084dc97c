// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repositories (C3)
//!
//! Thin data-access contracts over the relational store, one trait per
//! entity, grounded on the reference `PipelineRepository` trait shape
//! (async, `Send + Sync`, one method per required operation). Concrete
//! sqlx-backed implementations live in the `subflow` crate's
//! `infrastructure::repositories` module.

mod asr_merged_chunk_repository;
mod asr_segment_repository;
mod blob_repository;
mod global_context_repository;
mod project_repository;
mod semantic_chunk_repository;
mod stage_run_repository;
mod subtitle_export_repository;
mod vad_region_repository;

pub use asr_merged_chunk_repository::AsrMergedChunkRepository;
pub use asr_segment_repository::AsrSegmentRepository;
pub use blob_repository::BlobRepository;
pub use global_context_repository::GlobalContextRepository;
pub use project_repository::ProjectRepository;
pub use semantic_chunk_repository::SemanticChunkRepository;
pub use stage_run_repository::StageRunRepository;
pub use subtitle_export_repository::SubtitleExportRepository;
pub use vad_region_repository::VadRegionRepository;
