//! API Module
//!
//! HTTP client for the analysis backend.

pub mod client;

pub use client::*;
