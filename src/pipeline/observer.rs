use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::RelationError;

/// Context identifying a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageContext {
    /// The stage's name, as given to [`crate::pipeline::Pipeline::stage`].
    pub name: String,
    /// Zero-based position in the pipeline.
    pub index: usize,
}

/// Row-count and timing stats for one completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Rows entering the stage.
    pub rows_in: usize,
    /// Rows the stage produced.
    pub rows_out: usize,
    /// Wall-clock time the stage took.
    pub elapsed: Duration,
}

/// Observer hook for pipeline runs.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods have
/// empty defaults so an observer only implements what it cares about.
pub trait PipelineObserver: Send + Sync {
    /// Called before a stage runs.
    fn on_stage_started(&self, _ctx: &StageContext, _rows_in: usize) {}

    /// Called after a stage succeeds.
    fn on_stage_finished(&self, _ctx: &StageContext, _stats: &StageStats) {}

    /// Called when a stage fails; the run stops after this callback.
    fn on_stage_failed(&self, _ctx: &StageContext, _error: &RelationError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<std::sync::Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<std::sync::Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage_started(&self, ctx: &StageContext, rows_in: usize) {
        for o in &self.observers {
            o.on_stage_started(ctx, rows_in);
        }
    }

    fn on_stage_finished(&self, ctx: &StageContext, stats: &StageStats) {
        for o in &self.observers {
            o.on_stage_finished(ctx, stats);
        }
    }

    fn on_stage_failed(&self, ctx: &StageContext, error: &RelationError) {
        for o in &self.observers {
            o.on_stage_failed(ctx, error);
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_stage_started(&self, ctx: &StageContext, rows_in: usize) {
        eprintln!(
            "[pipeline][start] stage='{}' index={} rows_in={}",
            ctx.name, ctx.index, rows_in
        );
    }

    fn on_stage_finished(&self, ctx: &StageContext, stats: &StageStats) {
        eprintln!(
            "[pipeline][ok] stage='{}' index={} rows={}->{} elapsed={:?}",
            ctx.name, ctx.index, stats.rows_in, stats.rows_out, stats.elapsed
        );
    }

    fn on_stage_failed(&self, ctx: &StageContext, error: &RelationError) {
        eprintln!(
            "[pipeline][FAIL] stage='{}' index={} err={}",
            ctx.name, ctx.index, error
        );
    }
}

/// Real-time metrics for pipeline runs.
///
/// The pipeline updates these counters while running; callers can snapshot
/// them at any time through the handle returned by
/// [`crate::pipeline::Pipeline::metrics`].
pub struct PipelineMetrics {
    run_id: AtomicU64,
    stages_run: AtomicU64,
    stages_failed: AtomicU64,
    rows_in: AtomicU64,
    rows_out: AtomicU64,
    elapsed_ns: AtomicU64,
    started_at: Mutex<Option<Instant>>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            stages_run: AtomicU64::new(0),
            stages_failed: AtomicU64::new(0),
            rows_in: AtomicU64::new(0),
            rows_out: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            started_at: Mutex::new(None),
        }
    }

    pub(crate) fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        *self.started_at.lock().expect("metrics mutex poisoned") = Some(Instant::now());
        self.stages_run.store(0, Ordering::SeqCst);
        self.stages_failed.store(0, Ordering::SeqCst);
        self.rows_in.store(0, Ordering::SeqCst);
        self.rows_out.store(0, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(
            elapsed.as_nanos().min(u64::MAX as u128) as u64,
            Ordering::SeqCst,
        );
    }

    pub(crate) fn on_stage(&self, stats: &StageStats) {
        let _ = self.stages_run.fetch_add(1, Ordering::SeqCst);
        let _ = self.rows_in.fetch_add(stats.rows_in as u64, Ordering::SeqCst);
        let _ = self
            .rows_out
            .fetch_add(stats.rows_out as u64, Ordering::SeqCst);
    }

    pub(crate) fn on_stage_failure(&self) {
        let _ = self.stages_failed.fetch_add(1, Ordering::SeqCst);
    }

    /// Immutable copy of the current counters.
    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        PipelineMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            stages_run: self.stages_run.load(Ordering::SeqCst),
            stages_failed: self.stages_failed.load(Ordering::SeqCst),
            rows_in: self.rows_in.load(Ordering::SeqCst),
            rows_out: self.rows_out.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`PipelineMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineMetricsSnapshot {
    pub run_id: u64,
    pub stages_run: u64,
    pub stages_failed: u64,
    pub rows_in: u64,
    pub rows_out: u64,
    pub elapsed: Option<Duration>,
}

impl fmt::Display for PipelineMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, stages={} (failed={}), rows={}->{}, elapsed={:?}",
            self.run_id, self.stages_run, self.stages_failed, self.rows_in, self.rows_out,
            self.elapsed
        )
    }
}
