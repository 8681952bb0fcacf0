//! Site module - Commands built on the markup and html modules
//!
//! This module provides:
//! - scan: template and static asset discovery
//! - page: single-file rendering and page placeholder substitution
//! - check: parse every template and report problems per file
//! - build: render a whole site to an output directory

pub mod build;
pub mod check;
pub mod page;
pub mod scan;
