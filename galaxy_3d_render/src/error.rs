//! Error types for the Galaxy3D render layer
//!
//! This module defines the error types used throughout the crate,
//! including backend failures, resource misuse, and framebuffer
//! configuration problems.

use std::fmt;
use glam::UVec2;
use crate::device::{FramebufferStatus, PixelFormat};

/// Result type for Galaxy3D render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D render errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (surface, buffer, scratch block, etc.)
    InvalidResource(String),

    /// Framebuffer attachments cannot be assembled into a usable target
    Configuration(ConfigurationError),
}

/// Framebuffer configuration errors
///
/// Raised when an attachment table is finalized. Each variant carries
/// enough context to tell which slot is wrong and why.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Slot 0 has no surface bound
    MissingPrimaryAttachment,

    /// A colour slot does not match the size of slot 0
    IncompatibleSize {
        slot: u32,
        expected: UVec2,
        actual: UVec2,
    },

    /// A colour slot does not match the internal format of slot 0
    IncompatibleFormat {
        slot: u32,
        expected: PixelFormat,
        actual: PixelFormat,
    },

    /// The device rejects this combination of attachment formats
    UnsupportedFormatCombination,

    /// Any other non-complete status reported by the device
    Incomplete(FramebufferStatus),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingPrimaryAttachment => {
                write!(f, "Attachment 0 must have a surface attached")
            }
            ConfigurationError::IncompatibleSize { slot, expected, actual } => write!(
                f,
                "Attachment {} has incompatible size {}x{}. It must be the same as the size of surface 0, {}x{}",
                slot, actual.x, actual.y, expected.x, expected.y
            ),
            ConfigurationError::IncompatibleFormat { slot, expected, actual } => write!(
                f,
                "Attachment {} has incompatible format {:?} (surface 0 is {:?})",
                slot, actual, expected
            ),
            ConfigurationError::UnsupportedFormatCombination => {
                write!(f, "All framebuffer formats with this internal format combination are unsupported")
            }
            ConfigurationError::Incomplete(status) => {
                write!(f, "Framebuffer incomplete ({:?})", status)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::Configuration(err) => write!(f, "Invalid framebuffer configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Error::Configuration(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
