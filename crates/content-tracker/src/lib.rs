//! Content contribution tracking for a small team.
//!
//! Employees log articles and customer stories; the crate derives publishing
//! streaks, monthly and yearly quota progress, and leaderboards from the
//! contribution list, and drives the scheduled reminder and status e-mails.

pub mod auth;
pub mod config;
pub mod error;
pub mod notifications;
pub mod telemetry;
pub mod tracker;
