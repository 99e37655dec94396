//! Report renderers.
//!
//! - [`terminal`] — coloured tables for single assessments, batches, and the
//!   approvals case queue; respects `--verbose` / `--quiet`.
//!
//! JSON output is produced directly with `serde_json` in `main`.

pub mod terminal;
