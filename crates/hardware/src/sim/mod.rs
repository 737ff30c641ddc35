//! Program loading, simulation driver and reporting.
//!
//! Turns assembly text into a [`Program`](crate::isa::Program), runs it on the
//! engine through [`Simulator`], and renders the resulting trace.

/// Line tokenizer for assembly source.
pub mod lexer;
/// Source-to-program loader.
pub mod loader;
/// Timeline and trace rendering.
pub mod report;
/// Configuration, loader and engine facade.
pub mod simulator;

pub use self::loader::LoaderOptions;
pub use self::simulator::Simulator;
