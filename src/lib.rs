// THEORY:
// This file is the main entry point for the `cube_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the snapshot UI or a
// solver orchestrator).
//
// The primary goal is to export the `ScanPipeline` and its associated data
// structures (`ScanConfig`, `ScanReport`, `CubeState`, etc.) as the clean,
// high-level interface for the entire scanning engine. The low-level internal
// modules (`core_modules`) stay encapsulated behind that surface, providing a
// clean separation of concerns.

pub mod core_modules;
pub mod parallel_scanner;
pub mod pipeline;
pub mod session;
