//! SrcVeil Core Library
//!
//! This crate provides the core functionality for SrcVeil:
//! - Text-transform passes (string-literal markers, identifier renaming,
//!   dead-code injection)
//! - Marker finalization and decoder injection
//! - Pipeline orchestration and configuration
//! - Job reports and per-job artifact storage
//! - Credential/session store for the client-side role gate
//!
//! The transforms are source-level regex substitutions for demo purposes.
//! They do not parse the input and make no semantic guarantees.

pub mod auth;
pub mod decoder;
pub mod jobs;
pub mod obfuscator;
pub mod passes;
pub mod report;

// Re-export commonly used types
pub use auth::{AuthError, CredentialStore, Role, UserRecord};
pub use decoder::finalize_markers;
pub use jobs::{CompletedJob, Job, JobError, JobStore};
pub use obfuscator::{ObfuscateOptions, Obfuscator, PassKind, PassOutcome};
pub use report::{JobReport, OutputFile, PassEntry, TestSummary};
