//! Obfuscation pipeline
//!
//! Runs the selected transform passes over a source text in a fixed order:
//! string-literal markers, then identifier renaming, then dead-code
//! injection. Options come either from a submission JSON body or from a
//! `srcveil.toml` config file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::passes::{encrypt_strings, insert_bogus_functions, rename_identifiers};

/// Named transform passes the pipeline recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    /// Replace string literals with encoded markers
    StringEncrypt,
    /// Rename identifiers to sequential aliases
    RenameSymbols,
    /// Prepend bogus placeholder routines
    BogusInsert,
    /// Declared but unimplemented; accepted and ignored
    CfgFlatten,
}

impl PassKind {
    /// Pass name as it appears in options and reports
    pub fn name(&self) -> &'static str {
        match self {
            PassKind::StringEncrypt => "string-encrypt",
            PassKind::RenameSymbols => "rename-symbols",
            PassKind::BogusInsert => "bogus-insert",
            PassKind::CfgFlatten => "cfg-flatten",
        }
    }

    /// Parse a pass name (as used by the CLI)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string-encrypt" => Some(PassKind::StringEncrypt),
            "rename-symbols" => Some(PassKind::RenameSymbols),
            "bogus-insert" => Some(PassKind::BogusInsert),
            "cfg-flatten" => Some(PassKind::CfgFlatten),
            _ => None,
        }
    }
}

/// Transform request options
///
/// Matches the submission JSON (`{"passes": [...], "bogusCount": N}`).
/// Unknown fields are ignored. The UI caps `bogusCount` at 500 by
/// convention; the pipeline itself does not enforce a bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscateOptions {
    /// Passes to apply (order here is irrelevant; execution order is fixed)
    #[serde(default)]
    pub passes: Vec<PassKind>,

    /// Number of bogus routines for the dead-code pass
    #[serde(default)]
    pub bogus_count: u32,
}

impl ObfuscateOptions {
    /// Load options from a TOML config file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let options: ObfuscateOptions = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(options)
    }

    fn has(&self, kind: PassKind) -> bool {
        self.passes.contains(&kind)
    }
}

/// Result of running the pipeline on one source text
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// The transformed source (markers not yet finalized)
    pub source: String,
    /// Names of passes that actually ran, in execution order
    pub passes_applied: Vec<&'static str>,
    /// Number of string literals replaced with markers
    pub strings_encrypted: usize,
    /// Number of bogus routines injected
    pub bogus_functions_added: usize,
}

/// Obfuscator instance with request options
pub struct Obfuscator {
    options: ObfuscateOptions,
}

impl Obfuscator {
    pub fn new(options: ObfuscateOptions) -> Self {
        Self { options }
    }

    /// Run the selected passes in fixed order.
    ///
    /// `cfg-flatten` is accepted in the options but performs no rewrite and
    /// is never recorded as applied. The dead-code pass only runs when the
    /// bogus count is positive. Marker finalization is a separate step, see
    /// [`crate::decoder::finalize_markers`].
    pub fn apply(&self, source: &str) -> PassOutcome {
        let mut out = source.to_string();
        let mut passes_applied = Vec::new();
        let mut strings_encrypted = 0;
        let mut bogus_functions_added = 0;

        if self.options.has(PassKind::StringEncrypt) {
            let (rewritten, count) = encrypt_strings(&out);
            out = rewritten;
            strings_encrypted = count;
            passes_applied.push(PassKind::StringEncrypt.name());
            tracing::info!("{:>14}: {} literal(s)", PassKind::StringEncrypt.name(), count);
        }

        if self.options.has(PassKind::RenameSymbols) {
            let (rewritten, count) = rename_identifiers(&out);
            out = rewritten;
            passes_applied.push(PassKind::RenameSymbols.name());
            tracing::info!("{:>14}: {} identifier(s)", PassKind::RenameSymbols.name(), count);
        }

        if self.options.has(PassKind::BogusInsert) && self.options.bogus_count > 0 {
            let (rewritten, count) = insert_bogus_functions(&out, self.options.bogus_count);
            out = rewritten;
            bogus_functions_added = count;
            passes_applied.push(PassKind::BogusInsert.name());
            tracing::info!("{:>14}: {} routine(s)", PassKind::BogusInsert.name(), count);
        }

        PassOutcome {
            source: out,
            passes_applied,
            strings_encrypted,
            bogus_functions_added,
        }
    }
}
