//! Unified error types for tfnt_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for font conversion and container handling
#[derive(Debug, Error)]
pub enum FontError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file '{path}': {message}")]
    OpenFile { path: PathBuf, message: String },

    #[error("Failed to write file '{path}': {message}")]
    WriteFile { path: PathBuf, message: String },

    // === Source Errors ===
    #[error("Malformed font source at line {line}: {message}")]
    SourceParse { line: usize, message: String },

    #[error("Failed to load font: {message}")]
    FontLoad { message: String },

    #[error("Unsupported codepoint U+{codepoint:04X}: {reason}")]
    UnsupportedCodepoint { codepoint: u32, reason: String },

    #[error("No renderable glyphs left after conversion")]
    EmptyResult,

    #[error("Invalid canvas {width}x{height} (each side must be 1-255 pixels)")]
    InvalidCanvas { width: u32, height: u32 },

    // === Container Errors ===
    #[error("Invalid font container: magic number mismatch")]
    BadMagic,

    #[error("Unsupported font container version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("Unknown glyph layout flag: {flags}")]
    UnknownLayout { flags: u8 },

    #[error("Font container truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Invalid glyph index: {message}")]
    InvalidIndex { message: String },
}

/// Result type alias for tfnt_engine operations
pub type Result<T> = std::result::Result<T, FontError>;

impl FontError {
    /// Create an open file error
    pub fn open_file(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::OpenFile {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a write file error
    pub fn write_file(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::WriteFile {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn source_parse(line: usize, msg: impl Into<String>) -> Self {
        Self::SourceParse { line, message: msg.into() }
    }

    pub fn unsupported(codepoint: u32, reason: impl Into<String>) -> Self {
        Self::UnsupportedCodepoint {
            codepoint,
            reason: reason.into(),
        }
    }

    pub fn invalid_index(msg: impl std::fmt::Display) -> Self {
        Self::InvalidIndex { message: msg.to_string() }
    }
}
