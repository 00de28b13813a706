//! Outbound HTTP clients

pub mod client;
pub mod evaluation;
pub mod gemini;
pub mod github;
