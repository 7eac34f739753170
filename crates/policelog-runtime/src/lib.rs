//! Runtime: record assembly and ingestion runs.
//!
//! `RecordAssembler` turns selected rows into stored records, one row at a
//! time, skipping rows that fail. `Pipeline` drives whole documents:
//! at-most-once bookkeeping, download, table extraction, assembly.

pub mod assembler;
pub mod orchestrator;
pub mod types;

pub use assembler::RecordAssembler;
pub use orchestrator::Pipeline;
pub use types::*;
