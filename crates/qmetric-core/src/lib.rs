//! qmetric-core: exam paper evaluation engine.
//!
//! This crate defines the data model, the fixed cognitive lexicon, and the
//! classification, alignment and coverage scoring that the rest of qmetric
//! builds on.

pub mod alignment;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod levels;
pub mod lexicon;
pub mod model;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod statistics;
