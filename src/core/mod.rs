//! Core module - Contains the shared data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Site configuration (yamlsite.json)
//! - Path normalization utilities
//! - Template file reading

pub mod config;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
