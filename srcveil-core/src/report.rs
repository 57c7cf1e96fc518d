//! Job reports
//!
//! The flat record summarizing what a single transform request did. A
//! report is produced once per job, written alongside the output, and never
//! mutated. The functional-test field is a static placeholder; no
//! verification of the output is claimed or performed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::obfuscator::PassOutcome;

/// Placeholder status for the never-run functional test
pub const FUNCTIONAL_TEST_NOT_RUN: &str = "not-run";

/// Summary of a completed transform request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub input_files: Vec<String>,
    pub output_file: OutputFile,
    pub passes: Vec<PassEntry>,
    pub strings_encrypted: usize,
    pub bogus_functions_added: usize,
    pub tests: TestSummary,
}

/// Output artifact descriptor with measured byte sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFile {
    pub path: String,
    pub size_before: u64,
    pub size_after: u64,
}

/// One applied pass, by name only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassEntry {
    pub name: String,
}

/// Claimed test status (always the static placeholder)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub functional_test: String,
}

impl JobReport {
    /// Build a report from a pipeline outcome and the persisted artifacts.
    pub fn new(
        job_id: &str,
        outcome: &PassOutcome,
        output_path: &Path,
        size_before: u64,
        size_after: u64,
    ) -> Self {
        Self {
            job_id: job_id.to_string(),
            input_files: vec!["original.c".to_string()],
            output_file: OutputFile {
                path: output_path.display().to_string(),
                size_before,
                size_after,
            },
            passes: outcome
                .passes_applied
                .iter()
                .map(|name| PassEntry { name: name.to_string() })
                .collect(),
            strings_encrypted: outcome.strings_encrypted,
            bogus_functions_added: outcome.bogus_functions_added,
            tests: TestSummary {
                functional_test: FUNCTIONAL_TEST_NOT_RUN.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outcome() -> PassOutcome {
        PassOutcome {
            source: "transformed".to_string(),
            passes_applied: vec!["string-encrypt", "bogus-insert"],
            strings_encrypted: 3,
            bogus_functions_added: 2,
        }
    }

    #[test]
    fn test_report_carries_pass_names() {
        let report = JobReport::new("abc", &sample_outcome(), Path::new("out/obf_app.c"), 100, 250);
        let names: Vec<&str> = report.passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["string-encrypt", "bogus-insert"]);
        assert_eq!(report.strings_encrypted, 3);
        assert_eq!(report.bogus_functions_added, 2);
    }

    #[test]
    fn test_functional_test_is_static_placeholder() {
        let report = JobReport::new("abc", &sample_outcome(), Path::new("out/obf_app.c"), 1, 2);
        assert_eq!(report.tests.functional_test, "not-run");
    }

    #[test]
    fn test_report_serialization_round_trip() {
        let report = JobReport::new("abc", &sample_outcome(), Path::new("out/obf_app.c"), 100, 250);
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"job_id\": \"abc\""));
        assert!(json.contains("\"size_before\": 100"));
        let parsed: JobReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.output_file.size_after, 250);
    }
}
