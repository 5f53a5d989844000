//! Pipeline orchestration.
//!
//! This module provides:
//! - The orchestrator ([`Pipeline`]) and its settings ([`PipelineSettings`])
//! - Stages and outcomes ([`Stage`], [`PipelineResult`])
//! - Transition hooks ([`PipelineObserver`], [`TracingObserver`], [`NoopObserver`])
//!
//! # Flow
//!
//! `Validating → Shortening → Locating → Patching → Done`. The flow never goes
//! back; the first failing stage decides the result. An event that already
//! carries a short link still goes through every stage.

mod observer;
mod orchestrator;
mod result;

#[cfg(test)]
mod orchestrator_tests;

pub use observer::{Completion, NoopObserver, PipelineObserver, TracingObserver};
pub use orchestrator::{Pipeline, PipelineSettings};
pub use result::{PipelineResult, Stage};
