// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `spellbee::session::*` / `spellbee::words::*`.
// Most UI code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by tests and benchmarks
pub mod lookup;
pub mod session;
pub mod speech;
pub mod words;

// Private: required transitively by the modules above
mod app;
mod config;
mod event;
mod logging;
mod ui;
