//! Runs pool batch job: configuration and the fetch → reconcile → report pipeline.

pub mod config;
pub mod pipeline;
