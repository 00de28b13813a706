//! Deploy pipeline

pub mod attachments;
pub mod generator;
pub mod orchestrator;
pub mod pages;
pub mod provisioner;
pub mod publisher;
pub mod readme;
