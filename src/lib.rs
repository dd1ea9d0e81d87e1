// Core practice engine. The terminal front end in main.rs builds on these
// modules, and so do the integration tests and criterion benchmarks.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod session;
pub mod store;
