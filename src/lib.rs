//! Quietcut - Silence-based video trimming
//!
//! This library crate exposes the pipeline stages for integration testing.

pub mod config;
pub mod pipeline;
pub mod toc;
