//! Shared types and configuration for Voucherbook.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point amounts for voucher lines and totals
//! - Typed IDs for vouchers and master records
//! - Pagination types for list endpoints
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
