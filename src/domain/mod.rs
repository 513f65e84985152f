//! Core domain types and logic.

pub mod analytics;
pub mod bond;
pub mod catalog;
pub mod config_validation;
pub mod error;
pub mod explain;
pub mod history;
pub mod market_feed;
pub mod ranking;
pub mod request_gate;
pub mod statistics;
