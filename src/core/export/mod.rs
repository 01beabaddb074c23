//! Export orchestration
//!
//! This module provides the export logic, including:
//! - The sweep over variants and formats ([`ExportOrchestrator`])
//! - Translation job polling ([`JobPoller`])
//! - The synchronous STL path
//! - Summary and reporting

pub mod coordinator;
pub mod poller;
pub mod query;
pub mod stl;
pub mod summary;

pub use coordinator::{ExportOrchestrator, ExportPlan};
pub use poller::{JobPoller, Sleeper, TokioSleeper};
pub use summary::{ExportError, ExportErrorType, ExportSummary};
