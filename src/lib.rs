//! dependamerge - auto-approve and merge dependency-update bot PRs
//!
//! The decision engine lives in [`semver`], [`policy`], [`extract`], and
//! [`pipeline`]; [`orchestrator`] drives it across repositories. All remote
//! I/O goes through the [`platform::HostingService`] trait.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod pipeline;
pub mod platform;
pub mod policy;
pub mod semver;
pub mod settings;
pub mod types;
