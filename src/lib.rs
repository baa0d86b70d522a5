//! Repoquiz - repository comprehension quiz engine
//!
//! Takes a bounded snapshot of a repository's text files, extracts a
//! fixed-schema feature bag, and classifies externally generated
//! comprehension questions along two axes: a difficulty level and a set of
//! likely asking-company categories. Classification is dual-path (trained
//! models with deterministic rule fallback) and retrains online from
//! accumulated user feedback.

pub mod cache;
pub mod classifier;
pub mod models;
pub mod repo;
