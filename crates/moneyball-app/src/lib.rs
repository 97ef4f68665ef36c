// Library root: re-exports all modules so integration tests can drive the
// app without spawning the binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod report;
