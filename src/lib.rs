//! Listing Pilot - Merchandising Decision Service
//!
//! This crate recommends a single merchandising action ("what to list next")
//! to a small-business seller and tracks how recommendations perform so
//! future recommendations adapt.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
