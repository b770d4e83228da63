//! Core facade logic

pub mod config;
pub mod error;
pub mod facade;
pub mod snapshot;
pub mod units;
