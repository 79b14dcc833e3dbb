//! Command layer: GraphQL request builders, pure response normalizers, and
//! the runners that merge backend responses into the canonical mapping.
//!
//! Normalizers are pure functions from raw backend-shaped responses to the
//! canonical ordered mapping; runners own the backend calls and the
//! required-vs-optional error policy.

pub mod ls;
pub mod metrics;
pub mod show;
