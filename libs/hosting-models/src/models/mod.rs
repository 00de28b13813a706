//! API models

pub mod evaluation;
pub mod gemini;
pub mod github;
