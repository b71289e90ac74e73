//! Bounded-concurrency rendering of many shapefiles.
//!
//! Each shapefile is one blocking job on tokio's blocking pool; at most
//! `concurrency` jobs are in flight. Jobs share the base map and renderer
//! read-only and finish in any order.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use drought_common::DroughtError;
use futures::stream::{self, StreamExt};
use geodata::BaseMap;
use renderer::{render_shapefile, MapRenderer, OutputFormat, RenderOutcome};
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::config::DEFAULT_CONCURRENCY;

/// What to do when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Attempt every file and report failures at the end
    #[default]
    KeepGoing,
    /// Stop at the first failure without waiting for jobs in flight
    FailFast,
}

/// A shapefile that could not be rendered.
#[derive(Debug)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: DroughtError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.error)
    }
}

impl std::error::Error for FileFailure {}

/// Results of a run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<RenderOutcome>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Features skipped for unknown severity across all rendered files.
    pub fn features_skipped(&self) -> usize {
        self.rendered.iter().map(|o| o.features_skipped).sum()
    }
}

/// Renders shapefiles into an output directory.
pub struct BatchRunner {
    base: Arc<BaseMap>,
    renderer: Arc<MapRenderer>,
    out_dir: PathBuf,
    format: OutputFormat,
    concurrency: usize,
    policy: FailurePolicy,
}

impl BatchRunner {
    pub fn new(base: Arc<BaseMap>, renderer: Arc<MapRenderer>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            base,
            renderer,
            out_dir: out_dir.into(),
            format: OutputFormat::Png,
            concurrency: DEFAULT_CONCURRENCY,
            policy: FailurePolicy::KeepGoing,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Jobs in flight at once; at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render every shapefile.
    ///
    /// Under `KeepGoing` this always returns a report. Under `FailFast` the
    /// first failure is returned as soon as it is seen; jobs already running
    /// keep going on the blocking pool and their results are dropped. Pair
    /// with [`block_on_detached`] so the process does not wait for them.
    pub async fn run(&self, shapefiles: Vec<PathBuf>) -> Result<BatchReport, FileFailure> {
        let total = shapefiles.len();
        info!(
            files = total,
            concurrency = self.concurrency,
            format = %self.format,
            out_dir = %self.out_dir.display(),
            "Starting batch"
        );

        let mut results = stream::iter(shapefiles)
            .map(|source| self.render_one(source))
            .buffer_unordered(self.concurrency);

        let mut report = BatchReport::default();

        while let Some(result) = results.next().await {
            match result {
                Ok(outcome) => report.rendered.push(outcome),
                Err(failure) => {
                    error!(file = %failure.source.display(), error = %failure.error, "Render failed");
                    if self.policy == FailurePolicy::FailFast {
                        return Err(failure);
                    }
                    report.failed.push(failure);
                }
            }
        }

        info!(
            files = total,
            rendered = report.rendered.len(),
            failed = report.failed.len(),
            features_skipped = report.features_skipped(),
            "Batch complete"
        );
        Ok(report)
    }

    async fn render_one(&self, source: PathBuf) -> Result<RenderOutcome, FileFailure> {
        let base = self.base.clone();
        let renderer = self.renderer.clone();
        let out_dir = self.out_dir.clone();
        let format = self.format;
        let job_source = source.clone();

        let joined = tokio::task::spawn_blocking(move || {
            render_shapefile(&job_source, &base, &renderer, &out_dir, format)
        })
        .await;

        match joined {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(error)) => Err(FileFailure { source, error }),
            Err(join_error) => Err(FileFailure {
                source,
                error: DroughtError::TaskFailed(join_error.to_string()),
            }),
        }
    }
}

/// Drive `future` on `runtime`, then shut the runtime down without waiting
/// for blocking jobs that are still running.
///
/// Dropping a runtime joins its blocking pool, which would hold a fail-fast
/// exit until every in-flight render had written its output.
pub fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}
