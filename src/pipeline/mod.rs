//! Named multi-stage pipelines over [`crate::types::Relation`].
//!
//! A [`Pipeline`] threads a relation through an ordered list of named stages.
//! When a stage fails, its error is wrapped in
//! [`crate::RelationError::Stage`], so a multi-step run always identifies
//! which stage stopped it and why. An optional [`PipelineObserver`] receives
//! per-stage start/finish/failure callbacks, and shared [`PipelineMetrics`]
//! track row counts across the run.
//!
//! ```rust
//! use reltab::pipeline::Pipeline;
//! use reltab::reshape::{gather, separate};
//! use reltab::select::ColumnSelector;
//! use reltab::types::{DataType, Field, Relation, Schema, Value};
//!
//! # fn main() -> Result<(), reltab::RelationError> {
//! let schema = Schema::new(vec![
//!     Field::new("date", DataType::Utf8),
//!     Field::new("Google", DataType::Float64),
//!     Field::new("Facebook", DataType::Float64),
//! ]);
//! let prices = Relation::new(
//!     schema,
//!     vec![vec![
//!         Value::Utf8("2016-01-05".to_string()),
//!         Value::Float64(742.58),
//!         Value::Float64(102.97),
//!     ]],
//! )?;
//!
//! let pipeline = Pipeline::new()
//!     .stage("split date", |rel| separate(rel, "date", &["y", "m", "d"], "-"))
//!     .stage("gather prices", |rel| {
//!         gather(rel, "company", "price", &ColumnSelector::range("Google", "Facebook"))
//!     });
//!
//! let long = pipeline.run(prices)?;
//! assert_eq!(long.column_names(), vec!["y", "m", "d", "company", "price"]);
//! assert_eq!(long.row_count(), 2);
//! # Ok(())
//! # }
//! ```

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

pub use observer::{
    CompositeObserver, PipelineMetrics, PipelineMetricsSnapshot, PipelineObserver, StageContext,
    StageStats, StdErrObserver,
};

use crate::error::{RelationError, RelationResult};
use crate::types::Relation;

type StageFn = dyn Fn(&Relation) -> RelationResult<Relation> + Send + Sync;

struct Stage {
    name: String,
    op: Box<StageFn>,
}

/// An ordered list of named relation transforms.
pub struct Pipeline {
    stages: Vec<Stage>,
    observer: Option<Arc<dyn PipelineObserver>>,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            observer: None,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Append a named stage.
    pub fn stage<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&Relation) -> RelationResult<Relation> + Send + Sync + 'static,
    {
        self.stages.push(Stage {
            name: name.into(),
            op: Box::new(op),
        });
        self
    }

    /// Attach an observer for stage events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Get a handle to real-time run metrics.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every stage in order over `input`.
    ///
    /// On failure, the returned error is [`RelationError::Stage`] carrying the
    /// failing stage's name, position, and underlying error.
    pub fn run(&self, input: Relation) -> RelationResult<Relation> {
        let run_start = Instant::now();
        self.metrics.begin_run();

        let mut current = input;
        for (index, stage) in self.stages.iter().enumerate() {
            let ctx = StageContext {
                name: stage.name.clone(),
                index,
            };
            let rows_in = current.row_count();
            if let Some(obs) = &self.observer {
                obs.on_stage_started(&ctx, rows_in);
            }

            let stage_start = Instant::now();
            match (stage.op)(&current) {
                Ok(next) => {
                    let stats = StageStats {
                        rows_in,
                        rows_out: next.row_count(),
                        elapsed: stage_start.elapsed(),
                    };
                    self.metrics.on_stage(&stats);
                    if let Some(obs) = &self.observer {
                        obs.on_stage_finished(&ctx, &stats);
                    }
                    current = next;
                }
                Err(source) => {
                    self.metrics.on_stage_failure();
                    let error = RelationError::Stage {
                        stage: stage.name.clone(),
                        index,
                        source: Box::new(source),
                    };
                    if let Some(obs) = &self.observer {
                        obs.on_stage_failed(&ctx, &error);
                    }
                    return Err(error);
                }
            }
        }

        self.metrics.end_run(run_start.elapsed());
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name.as_str()).collect();
        f.debug_struct("Pipeline")
            .field("stages", &names)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Pipeline, PipelineObserver, StageContext, StageStats};
    use crate::error::RelationError;
    use crate::reshape::gather;
    use crate::select::ColumnSelector;
    use crate::types::{DataType, Field, Relation, Schema, Value};

    fn wide() -> Relation {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Int64),
        ]);
        Relation::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Int64(10), Value::Int64(20)],
                vec![Value::Int64(2), Value::Int64(30), Value::Int64(40)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn run_threads_relation_through_stages_in_order() {
        let pipeline = Pipeline::new()
            .stage("gather", |rel| {
                gather(rel, "k", "v", &ColumnSelector::names(["a", "b"]))
            })
            .stage("keep a", |rel| {
                Ok(rel.filter_rows(|row| row[1] == Value::Utf8("a".to_string())))
            });

        let out = pipeline.run(wide()).unwrap();
        assert_eq!(out.row_count(), 2);

        let snap = pipeline.metrics().snapshot();
        assert_eq!(snap.stages_run, 2);
        assert_eq!(snap.stages_failed, 0);
        assert_eq!(snap.rows_in, 2 + 4);
        assert_eq!(snap.rows_out, 4 + 2);
        assert!(snap.elapsed.is_some());
    }

    #[test]
    fn failing_stage_is_named_in_the_error() {
        let pipeline = Pipeline::new()
            .stage("ok", |rel| Ok(rel.clone()))
            .stage("bad gather", |rel| {
                gather(rel, "k", "v", &ColumnSelector::Name("nope".to_string()))
            });

        let err = pipeline.run(wide()).unwrap_err();
        match &err {
            RelationError::Stage { stage, index, .. } => {
                assert_eq!(stage, "bad gather");
                assert_eq!(*index, 1);
            }
            other => panic!("expected Stage error, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("pipeline stage 'bad gather' (#1) failed"));
        assert!(msg.contains("column 'nope' not found"));
    }

    struct CountingObserver {
        started: AtomicUsize,
        finished: AtomicUsize,
        failed: AtomicUsize,
    }

    impl PipelineObserver for CountingObserver {
        fn on_stage_started(&self, _ctx: &StageContext, _rows_in: usize) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stage_finished(&self, _ctx: &StageContext, _stats: &StageStats) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stage_failed(&self, _ctx: &StageContext, _error: &RelationError) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn observer_sees_every_stage_and_the_failure() {
        let observer = Arc::new(CountingObserver {
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        });
        let pipeline = Pipeline::new()
            .stage("ok", |rel| Ok(rel.clone()))
            .stage("bad", |rel| {
                gather(rel, "k", "v", &ColumnSelector::Name("nope".to_string()))
            })
            .stage("unreached", |rel| Ok(rel.clone()))
            .with_observer(observer.clone());

        let _ = pipeline.run(wide()).unwrap_err();
        assert_eq!(observer.started.load(Ordering::SeqCst), 2);
        assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
        assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_pipeline_returns_input_unchanged() {
        let rel = wide();
        let out = Pipeline::new().run(rel.clone()).unwrap();
        assert_eq!(out, rel);
    }
}
