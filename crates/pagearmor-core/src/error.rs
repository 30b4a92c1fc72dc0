// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PageArmor.

use thiserror::Error;

/// Top-level error type for all PageArmor operations.
#[derive(Debug, Error)]
pub enum ArmorError {
    // -- Document shape --
    #[error("document has no pages")]
    EmptyDocument,

    #[error("page {page_index} has invalid geometry {width}x{height}")]
    InvalidGeometry {
        page_index: usize,
        width: u32,
        height: u32,
    },

    #[error("no pages to assemble")]
    EmptyInput,

    // -- External collaborators --
    #[error("rasterization failed: {0}")]
    RenderFailure(String),

    #[error("flattening failed: {0}")]
    FlattenFailure(String),

    // -- Processing --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("hardening run was cancelled")]
    Cancelled,

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ArmorError {
    /// Stable machine-readable tag for this error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyDocument => "empty_document",
            Self::InvalidGeometry { .. } => "invalid_geometry",
            Self::EmptyInput => "empty_input",
            Self::RenderFailure(_) => "render_failure",
            Self::FlattenFailure(_) => "flatten_failure",
            Self::ImageError(_) => "image_error",
            Self::PdfError(_) => "pdf_error",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Cancelled => "cancelled",
            Self::IntegrityMismatch { .. } => "integrity_mismatch",
            Self::Io(_) => "io_failure",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ArmorError>;
