//! Integration tests for the sweep loop
//!
//! These tests drive the public API against a simulated reading site
//! instead of a real WebDriver session.

mod support;
mod sweep_tests;
