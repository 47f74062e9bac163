//! Runtime configuration for the demo tooling.
//!
//! [`grid`] holds the JSON config schema and command-line parsing of the
//! `grid_demo` binary. Detector parameters themselves are
//! [`GridParams`](crate::GridParams).

pub mod grid;
