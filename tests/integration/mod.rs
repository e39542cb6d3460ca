//! Integration tests for crash-repro
//!
//! These tests verify that the reproducer and the bridges work together.

#[cfg(unix)]
#[path = "../common/mod.rs"]
pub mod common;

pub mod campaign_flow;
