//! The request pipeline.
//!
//! Each URL independently passes [`UrlValidator`], then [`TrustList`]
//! (short-circuit), then encode + score, producing a [`PredictionResult`].
//! [`BatchOrchestrator`] applies that to a bounded list and aggregates.

mod batch;
mod predict;
mod result;
mod trust_list;
mod validator;

pub use batch::BatchOrchestrator;
pub use predict::PredictionPipeline;
pub use result::{BatchOutcome, BatchResult, Prediction, PredictionFailure, PredictionResult};
pub use trust_list::TrustList;
pub use validator::{UrlValidator, ValidationError};
