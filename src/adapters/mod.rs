//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
#[cfg(feature = "ai")]
pub mod gemini_adapter;
pub mod rand_jitter;
