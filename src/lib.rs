//! # License Level
//!
//! Condensed view of license server usage, built from the text report of
//! `dslsstat -usage`.
//!
//! ## Overview
//!
//! The report lists each license feature ("trigram") in a pipe-delimited
//! table, once per license pool, with per-job usage lines underneath. This
//! library turns that into a [`models::Summary`] and renders it as:
//!
//! ```text
//! QAX 7 available of 10 tokens
//!     jobA using 3 licenses
//! ```
//!
//! ## Features
//!
//! - `colors` (default): Highlights errors and exhausted features via owo-colors

/// Command-line argument parsing and feature selection
pub mod cli;

/// Text and JSON rendering of a parsed summary
pub mod display;

/// Data models for feature status and usage lines
pub mod models;

/// Usage report parsing
pub mod report;

/// Input acquisition and logging setup
pub mod utils;
