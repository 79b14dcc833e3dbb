//! Damon: Data Asset Monitor
//!
//! Queries a data-orchestration platform (GraphQL), an object store, and a
//! data warehouse, then normalizes the heterogeneous responses into one
//! canonical ordered mapping rendered as a colorized console tree, JSON, or
//! clipboard markdown.

pub mod asset;
pub mod cli;
pub mod commands;
pub mod config;
pub mod connector;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod render;
