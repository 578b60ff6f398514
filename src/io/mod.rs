//! Input module
//!
//! Resolves command line paths or standard input into readable
//! benchmark streams.

pub mod input;

pub use input::{determine_inputs, Inputs};
