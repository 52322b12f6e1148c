//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the rasterizer:
//! - Math types and operations
//! - Handle-based collections for the scene registry
//! - Time measurement for frame statistics
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
