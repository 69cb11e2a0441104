//! Integration tests for the tagwatch CLI

pub mod cache;
pub mod cli;
pub mod common;
pub mod status;
