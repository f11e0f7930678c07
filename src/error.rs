//! Structured error types for the Folio layout layer.
//!
//! One unified enum covers the real error sources: bad configuration values
//! handed to the legacy-compatible string parsers, links that were allocated
//! but never resolved, resources the canvas cannot interpret, and I/O during
//! output. Layout overflow is deliberately *not* here: text that cannot be
//! placed is recovered locally by returning the leftover to the caller.

use crate::links::LinkId;

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, FolioError>;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// Unknown measurement unit string (expected "pt", "mm", "cm" or "in").
    #[error("unsupported unit: {0:?}")]
    UnsupportedUnit(String),

    /// Orientation string that is neither portrait nor landscape.
    #[error("invalid orientation: {0:?}")]
    InvalidOrientation(String),

    /// Unrecognized page format name.
    #[error("invalid page format: {0:?}")]
    InvalidFormat(String),

    /// Border spec containing characters outside L/T/R/B.
    #[error("invalid border spec: {0:?}")]
    InvalidBorder(String),

    /// Alignment spec that is none of L/C/R/J.
    #[error("invalid alignment: {0:?}")]
    InvalidAlignment(String),

    /// Font style spec containing characters outside B/I/U.
    #[error("invalid font style: {0:?}")]
    InvalidStyle(String),

    /// A drawing call was made before the first page was started.
    #[error("no page has been started")]
    NoPage,

    /// A link was allocated but had no rectangle or destination at close.
    #[error("link {0} was never placed or given a destination")]
    UnresolvedLink(LinkId),

    /// The canvas cannot interpret the given image source.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The canvas rejected a font selection.
    #[error("font error: {0}")]
    Font(String),

    /// I/O failure while writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
