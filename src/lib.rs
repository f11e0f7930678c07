//! # Folio
//!
//! A cursor-driven, top-down PDF authoring layer in the classic legacy
//! tradition (`add_page`, `cell`, `multi_cell`, `write`, automatic page
//! breaks, header/footer hooks) emulated on top of a modern canvas
//! primitive that thinks in bottom-up points and has no cursor at all.
//!
//! Modern PDF primitives are deliberately minimal: a page is a blank
//! surface, text boxes take explicit rectangles, nothing remembers where
//! the last call stopped. Entire ecosystems of documents were written
//! against the older model instead, where the library tracks a pen
//! position, wraps text at margins, and breaks pages for you. Folio is
//! that model, rebuilt as a layout engine in front of a pluggable backend.
//!
//! ## Architecture
//!
//! ```text
//! caller API (cell / write / hooks)
//!       ↓
//!   [document] — cursor, margins, page breaks, two-pass close
//!       ↓
//!   [wrap]     — legacy word/char wrap-mode control
//!       ↓
//!   [canvas]   — the external PDF primitive, behind a trait
//! ```
//!
//! Headers, footers, and internal links depend on the final page count, so
//! they are committed by a second pass when the document closes; during
//! layout the header hook runs in measuring mode only, to reserve its
//! height. See [`document`] for the full protocol.
//!
//! ## Example
//!
//! ```
//! use folio::{CellOptions, DocumentBuilder, RecordingCanvas, Unit};
//!
//! let mut doc = DocumentBuilder::new()
//!     .unit(Unit::Mm)
//!     .title("Hello")
//!     .build(RecordingCanvas::new());
//! doc.add_page()?;
//! doc.cell(40.0, 10.0, "Hello world", &CellOptions::default())?;
//! let mut out = Vec::new();
//! doc.output(&mut out)?;
//! # Ok::<(), folio::FolioError>(())
//! ```

pub mod canvas;
pub mod document;
pub mod error;
pub mod geometry;
pub mod links;
pub mod metrics;
pub mod state;
pub mod wrap;

pub use canvas::recording::{DrawOp, RecordedPage, RecordingCanvas};
pub use canvas::{Align, Canvas, ImageSource, LinkTarget, Metadata, TextBox, TextBoxOutcome, VAlign};
pub use document::cell::{Border, CellOptions, CursorAdvance, MultiCellOptions, CELL_PADDING};
pub use document::{Document, DocumentBuilder, ImageOptions, RectStyle};
pub use error::{FolioError, Result};
pub use geometry::{Edges, Orientation, PageSize, PageSpace, Rect, Unit};
pub use links::{LinkId, LinkRef};
pub use metrics::{CoreFont, FontMetrics};
pub use state::{Color, FontStyle, GraphicsSnapshot, LayoutMode};
pub use wrap::WrapStrategy;
