//! Wire models shared by the pagedrop clients
//!
//! Request and response bodies for the GitHub REST API, the Gemini
//! `generateContent` endpoint and the evaluation callback.

pub mod models;

pub use models::evaluation::EvaluationPayload;
pub use models::gemini::{GenerateContentRequest, GenerateContentResponse};
pub use models::github::{
    ContentResponse, CreateRepositoryRequest, PagesRequest, PagesSource, PutContentRequest,
};
