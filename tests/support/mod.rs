//! Shared helpers for integration tests.
#![allow(dead_code)]

pub mod rspec_runner;
pub mod thread_safe_app;
