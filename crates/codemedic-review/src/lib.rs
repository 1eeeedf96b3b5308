//! AI suggestions and checkup orchestration.
//!
//! Provides the completion client, prompt construction, and the pipeline
//! that runs the syntax, static-analysis and suggestion stages in order.

pub mod llm;
pub mod pipeline;
pub mod prompt;
