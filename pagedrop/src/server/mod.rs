//! HTTP front door

pub mod handlers;
pub mod serve;
pub mod state;
