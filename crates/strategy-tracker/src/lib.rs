//! Multi-tenant strategy tracking core.
//!
//! Three pieces sit underneath every request: the [`catalog`] of cascading choices,
//! the [`scoring`] functions that derive stored and read-time metrics, and the
//! [`access`] resolver that turns an authenticated identity into a role, a capability
//! map and a tenant scope. [`service::StrategyService`] composes them over any
//! [`repository::StrategyStore`].

pub mod access;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;
