//! Electric vehicle registration dashboard.
//!
//! CSV rows are normalized into [`types::VehicleRecord`]s, summarized by
//! [`aggregate`] into overview cards and chart series, and browsed through
//! the generic [`table`] engine.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod headers;
pub mod loader;
pub mod logging;
pub mod output;
pub mod table;
pub mod types;
pub mod util;
