//! Per-job artifact store
//!
//! Every transform request gets its own directory under the jobs root,
//! keyed by a freshly generated UUID:
//!
//! ```text
//! <jobs>/<job-id>/original.c
//! <jobs>/<job-id>/out/obf_app.c
//! <jobs>/<job-id>/out/report.json
//! ```
//!
//! Fresh ids make the layout collision-free without coordination. Artifacts
//! are written once and retained indefinitely; there is no eviction.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::decoder::finalize_markers;
use crate::obfuscator::{ObfuscateOptions, Obfuscator};
use crate::report::JobReport;

const ORIGINAL_FILE: &str = "original.c";
const OUT_DIR: &str = "out";
const OUTPUT_FILE: &str = "obf_app.c";
const REPORT_FILE: &str = "report.json";

/// Error types for job processing
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("No code provided")]
    EmptySource,

    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Job I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store rooted at a jobs directory
#[derive(Debug, Clone)]
pub struct JobStore {
    root: PathBuf,
}

/// A single job's directory
#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    dir: PathBuf,
}

/// A fully processed request: artifacts on disk plus the report
#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub job: Job,
    pub report: JobReport,
}

impl JobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a fresh job directory keyed by a new UUID.
    pub fn create_job(&self) -> Result<Job, JobError> {
        let id = Uuid::new_v4().to_string();
        let dir = self.root.join(&id);
        fs::create_dir_all(dir.join(OUT_DIR))?;
        Ok(Job { id, dir })
    }

    /// Run a whole transform request: validate, persist the original, apply
    /// the pipeline and marker finalization, persist the output and report.
    pub fn run(&self, code: &str, options: &ObfuscateOptions) -> Result<CompletedJob, JobError> {
        if code.is_empty() {
            return Err(JobError::EmptySource);
        }

        let job = self.create_job()?;
        let original_path = job.save_original(code)?;

        let outcome = Obfuscator::new(options.clone()).apply(code);
        let final_source = finalize_markers(&outcome.source);
        let output_path = job.save_output(&final_source)?;

        let size_before = fs::metadata(&original_path)?.len();
        let size_after = fs::metadata(&output_path)?.len();

        let report = JobReport::new(job.id(), &outcome, &output_path, size_before, size_after);
        job.save_report(&report)?;

        tracing::info!(
            "Job {} complete: {} -> {} bytes, {} pass(es)",
            job.id(),
            size_before,
            size_after,
            report.passes.len()
        );

        Ok(CompletedJob { job, report })
    }

    /// Resolve the transformed text for a previously processed job.
    ///
    /// Returns `UnknownJob` when the id has no directory or its output was
    /// never produced.
    pub fn output_path(&self, job_id: &str) -> Result<PathBuf, JobError> {
        let path = self.root.join(job_id).join(OUT_DIR).join(OUTPUT_FILE);
        if !path.is_file() {
            return Err(JobError::UnknownJob(job_id.to_string()));
        }
        Ok(path)
    }

    /// Friendly filename for downloading a job's output
    pub fn download_name(job_id: &str) -> String {
        format!("obf_app_{}.c", job_id)
    }
}

impl Job {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_original(&self, code: &str) -> Result<PathBuf, JobError> {
        let path = self.dir.join(ORIGINAL_FILE);
        fs::write(&path, code)?;
        Ok(path)
    }

    pub fn save_output(&self, code: &str) -> Result<PathBuf, JobError> {
        let path = self.dir.join(OUT_DIR).join(OUTPUT_FILE);
        fs::write(&path, code)?;
        Ok(path)
    }

    pub fn save_report(&self, report: &JobReport) -> Result<PathBuf, JobError> {
        let path = self.dir.join(OUT_DIR).join(REPORT_FILE);
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        Ok(path)
    }
}
