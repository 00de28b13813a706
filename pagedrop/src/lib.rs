//! pagedrop
//!
//! Turns a task brief into a generated single-page app, publishes it to a
//! per-task GitHub repository served by GitHub Pages, and reports the URLs
//! to an evaluation endpoint.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod naming;
pub mod notifier;
pub mod server;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
