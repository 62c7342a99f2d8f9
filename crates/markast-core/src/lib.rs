//! Markast Core
//!
//! This crate provides the AST, options, source locations and error
//! definitions shared by the markast parser, renderer and tools.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`Node`], [`NodeKind`] - The closed tagged union every parser stage produces
//! - [`Alignment`], [`AutolinkKind`], [`Fence`] - Node payload types
//! - [`ParserOptions`] - Per-call parser configuration
//! - [`ParseError`], [`Error`] - Error types
//! - [`SourceLocation`] - Source positions

pub mod ast;
pub mod error;
pub mod options;
pub mod types;

pub use ast::{Alignment, AutolinkKind, Fence, Node, NodeKind};
pub use error::{Error, ParseError, Phase, Result};
pub use options::ParserOptions;
pub use types::SourceLocation;
