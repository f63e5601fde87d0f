//! Scene description language support.
//!
//! This module provides:
//! - Tokenizing and parsing of scene text
//! - Loading scene files from disk

pub mod lexer;
pub mod loader;
pub mod parser;

pub use loader::load_scene;
pub use parser::parse_scene;
