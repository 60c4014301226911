//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training learners on discrete environments
//! - Evaluating learned policies greedily
//! - Recording observations during training

pub mod baseline;
pub mod observers;
pub mod training;

// Re-export learner implementations (adapters)
pub use baseline::RandomLearner;
// Re-export observer implementations (adapters)
pub use observers::{
    CallbackObserver, EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary,
    ProgressObserver, ReportObserver,
};
pub use training::{
    AVERAGE_WINDOW, EpisodeReport, TrainingConfig, TrainingPipeline, TrainingResult,
    evaluate_learner, rolling_mean,
};

// Re-export ports (trait definitions)
pub use crate::ports::{Learner, Observer};
