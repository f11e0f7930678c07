//! # The Document
//!
//! The legacy-style authoring surface: a persistent cursor in a top-down,
//! paper-origin coordinate system, margin-aware drawing primitives, and
//! automatic page breaks, all emulated on top of a [`Canvas`] that knows
//! none of those things.
//!
//! ## Why two passes
//!
//! Headers and footers may show "page X of N", and internal links may point
//! at pages that do not exist yet, so neither can be finalized while content
//! is still flowing. Folio therefore runs the header hook in *measuring*
//! mode when a page starts (reserving its height without committing marks),
//! and replays all headers, footers, and internal links for real when the
//! document closes and the page count is known. Graphics state is captured
//! pre-header and pre-footer for every page so the replay sees exactly the
//! fonts, colors, and margins that were current at first-pass time.
//!
//! ## Lifecycle
//!
//! ```text
//! DocumentBuilder ──build()──► Deferred ──add_page()──► Active
//!                                                         │ close()
//!                                          Closed ◄── Replay
//! ```
//!
//! The builder holds pending configuration; the first page freezes the
//! defaults into the running document. `close` is idempotent.

pub mod cell;
pub mod flow;

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::canvas::{Canvas, ImageSource, LinkTarget, Metadata};
use crate::error::{FolioError, Result};
use crate::geometry::{Edges, Orientation, PageSize, PageSpace, Rect, Unit, PT_PER_CM, PT_PER_MM};
use crate::links::{Destination, LinkId, LinkRef, LinkRegistry};
use crate::state::{Color, FontSelection, FontStyle, GraphicsSnapshot, LayoutMode};

/// Default stroke width applied when the first page starts, in points.
const DEFAULT_LINE_WIDTH: f64 = 0.2 * PT_PER_MM;

/// Where the document is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Built, but no page yet; configuration is still settling.
    Deferred,
    /// Pages exist and content is flowing.
    Active,
    /// The close replay is running headers, footers, and links.
    Replay,
    /// Closed; a second close is a no-op.
    Closed,
}

/// How `rect` paints its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectStyle {
    #[default]
    Stroke,
    Fill,
    StrokeFill,
}

/// Options for `image`. `None` coordinates mean "at the cursor"; `None` or
/// zero extents are derived from the intrinsic size, preserving aspect.
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub link: Option<LinkRef>,
}

type Hook<C> = Box<dyn FnMut(&mut Document<C>) -> Result<()>>;
type BreakHook<C> = Box<dyn FnMut(&mut Document<C>) -> bool>;

/// The lifecycle hooks a caller may install. Held apart from the rest of the
/// document state so they can be taken out while they run against it.
struct Hooks<C: Canvas> {
    header: Option<Hook<C>>,
    footer: Option<Hook<C>>,
    accept_break: Option<BreakHook<C>>,
}

impl<C: Canvas> Default for Hooks<C> {
    fn default() -> Self {
        Self {
            header: None,
            footer: None,
            accept_break: None,
        }
    }
}

/// Pending configuration for a document. Nothing touches a canvas until
/// [`DocumentBuilder::build`]; the defaults are frozen into the document
/// when its first page is added.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    orientation: Orientation,
    unit: Unit,
    page_size: PageSize,
    /// Margins in points. Left/top/right default to 1 cm, bottom to 2 cm,
    /// matching the legacy defaults.
    margins: Edges,
    font: FontSelection,
    metadata: Metadata,
    auto_page_break: bool,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            unit: Unit::Mm,
            page_size: PageSize::A4,
            margins: Edges::new(PT_PER_CM, PT_PER_CM, PT_PER_CM, 2.0 * PT_PER_CM),
            font: FontSelection::default(),
            metadata: Metadata::default(),
            auto_page_break: true,
        }
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Margins in the configured unit: left, top, right. The bottom margin
    /// belongs to `auto_page_break`.
    pub fn margins(mut self, left: f64, top: f64, right: f64) -> Self {
        self.margins.left = self.unit.to_pt(left);
        self.margins.top = self.unit.to_pt(top);
        self.margins.right = self.unit.to_pt(right);
        self
    }

    pub fn font(mut self, family: &str, style: FontStyle, size: f64) -> Self {
        self.font = FontSelection {
            family: family.to_string(),
            style,
            size,
        };
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.metadata.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.metadata.author = Some(author.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.metadata.subject = Some(subject.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.metadata.keywords = Some(keywords.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.metadata.creator = Some(creator.to_string());
        self
    }

    pub fn auto_page_break(mut self, on: bool) -> Self {
        self.auto_page_break = on;
        self
    }

    /// Freeze the configuration and bind it to a canvas backend.
    pub fn build<C: Canvas>(self, canvas: C) -> Document<C> {
        let (width, height) = self.page_size.oriented(self.orientation);
        Document {
            canvas,
            unit: self.unit,
            orientation: self.orientation,
            page_size: self.page_size,
            page_width: width,
            page_height: height,
            margins: self.margins,
            cursor: (0.0, 0.0),
            lifecycle: Lifecycle::Deferred,
            mode: LayoutMode::Committing,
            auto_page_break: self.auto_page_break,
            last_cell_height: 0.0,
            font: self.font,
            text_color: Color::BLACK,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            metadata: self.metadata,
            page_alias: None,
            alias_active: false,
            pre_header: HashMap::new(),
            pre_footer: HashMap::new(),
            links: LinkRegistry::new(),
            hooks: Hooks::default(),
        }
    }
}

/// A document being authored against a canvas backend `C`.
pub struct Document<C: Canvas> {
    pub(crate) canvas: C,
    unit: Unit,
    orientation: Orientation,
    page_size: PageSize,
    pub(crate) page_width: f64,
    pub(crate) page_height: f64,
    pub(crate) margins: Edges,
    /// Native bottom-up points.
    pub(crate) cursor: (f64, f64),
    lifecycle: Lifecycle,
    pub(crate) mode: LayoutMode,
    auto_page_break: bool,
    /// Height of the most recent cell, in points; feeds `ln(None)`.
    pub(crate) last_cell_height: f64,
    font: FontSelection,
    pub(crate) text_color: Color,
    pub(crate) fill_color: Color,
    stroke_color: Color,
    line_width: f64,
    metadata: Metadata,
    page_alias: Option<String>,
    alias_active: bool,
    pre_header: HashMap<usize, GraphicsSnapshot>,
    pre_footer: HashMap<usize, GraphicsSnapshot>,
    pub(crate) links: LinkRegistry,
    hooks: Hooks<C>,
}

impl<C: Canvas> Document<C> {
    // ── Hooks ───────────────────────────────────────────────────

    /// Install the header hook. Called once in measuring mode when each page
    /// starts (its cursor movement reserves the header height) and once for
    /// real during close: exactly two invocations per page, the second one
    /// authoritative.
    pub fn set_header(
        &mut self,
        hook: impl FnMut(&mut Document<C>) -> Result<()> + 'static,
    ) {
        self.hooks.header = Some(Box::new(hook));
    }

    /// Install the footer hook. Called exactly once per page, during close,
    /// with the cursor at the paper corner.
    pub fn set_footer(
        &mut self,
        hook: impl FnMut(&mut Document<C>) -> Result<()> + 'static,
    ) {
        self.hooks.footer = Some(Box::new(hook));
    }

    /// Install the page-break accept hook. When a drawing operation crosses
    /// the bottom margin, the hook decides whether the break happens; it may
    /// mutate margins or cursor first (the multi-column protocol). Without a
    /// hook the decision is the auto-page-break flag.
    pub fn set_accept_page_break(&mut self, hook: impl FnMut(&mut Document<C>) -> bool + 'static) {
        self.hooks.accept_break = Some(Box::new(hook));
    }

    fn run_header(&mut self) -> Result<()> {
        if let Some(mut hook) = self.hooks.header.take() {
            let outcome = hook(self);
            if self.hooks.header.is_none() {
                self.hooks.header = Some(hook);
            }
            outcome?;
        }
        Ok(())
    }

    fn run_footer(&mut self) -> Result<()> {
        if let Some(mut hook) = self.hooks.footer.take() {
            let outcome = hook(self);
            if self.hooks.footer.is_none() {
                self.hooks.footer = Some(hook);
            }
            outcome?;
        }
        Ok(())
    }

    // ── Coordinate plumbing ─────────────────────────────────────

    pub(crate) fn space(&self) -> PageSpace {
        PageSpace::new(self.page_width, self.page_height, self.unit)
    }

    pub(crate) fn require_page(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Deferred => Err(FolioError::NoPage),
            _ => Ok(()),
        }
    }

    /// Substitute the page-count alias while the replay pass is live.
    pub(crate) fn substituted(&self, text: &str) -> String {
        match (&self.page_alias, self.alias_active) {
            (Some(alias), true) => text.replace(alias, &self.canvas.page_count().to_string()),
            _ => text.to_string(),
        }
    }

    // ── Cursor control ──────────────────────────────────────────

    /// Cursor X in user units.
    pub fn x(&self) -> f64 {
        self.space().user_x(self.cursor.0)
    }

    /// Set cursor X. Negative values measure from the right edge.
    pub fn set_x(&mut self, x: f64) {
        self.cursor.0 = self.space().native_x(x);
    }

    /// Cursor Y in user units, top-down from the paper edge.
    pub fn y(&self) -> f64 {
        self.space().user_y(self.cursor.1)
    }

    /// Set cursor Y (top-down; negative measures from the bottom) and return
    /// the cursor X to the left margin, as the legacy call does.
    pub fn set_y(&mut self, y: f64) {
        self.cursor.0 = self.margins.left;
        self.cursor.1 = self.space().native_y(y);
    }

    /// Set both coordinates without the left-margin reset of `set_y`.
    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.cursor.1 = self.space().native_y(y);
        self.cursor.0 = self.space().native_x(x);
    }

    /// Line feed: X returns to the left margin, Y advances by `height` user
    /// units, or by the last cell height when `None`.
    pub fn ln(&mut self, height: Option<f64>) {
        let h = match height {
            Some(v) => self.space().length(v),
            None => self.last_cell_height,
        };
        self.cursor.0 = self.margins.left;
        self.cursor.1 -= h;
    }

    /// Current page number (1-based, 0 before the first page).
    pub fn page_no(&self) -> usize {
        self.canvas.page_number()
    }

    /// Height of the most recent cell, in user units.
    pub fn last_cell_height(&self) -> f64 {
        self.space().user_length(self.last_cell_height)
    }

    /// Width of `text` in the current font, in user units.
    pub fn string_width(&self, text: &str) -> f64 {
        self.space().user_length(self.canvas.text_width(text))
    }

    // ── State setters ───────────────────────────────────────────

    pub fn set_margins(&mut self, left: f64, top: f64, right: Option<f64>) {
        self.set_left_margin(left);
        self.set_top_margin(top);
        if let Some(r) = right {
            self.set_right_margin(r);
        }
    }

    /// Set the left margin; the cursor is pushed right if it would end up
    /// outside the new margin.
    pub fn set_left_margin(&mut self, margin: f64) {
        let m = self.space().length(margin);
        self.margins.left = m;
        if self.cursor.0 < m {
            self.cursor.0 = m;
        }
    }

    pub fn set_top_margin(&mut self, margin: f64) {
        self.margins.top = self.space().length(margin);
    }

    pub fn set_right_margin(&mut self, margin: f64) {
        self.margins.right = self.space().length(margin);
    }

    /// Toggle automatic page breaking; optionally move the bottom margin the
    /// break threshold is measured against.
    pub fn set_auto_page_break(&mut self, on: bool, bottom_margin: Option<f64>) {
        self.auto_page_break = on;
        if let Some(m) = bottom_margin {
            self.margins.bottom = self.space().length(m);
        }
    }

    pub fn auto_page_break_enabled(&self) -> bool {
        self.auto_page_break
    }

    /// Register the token substituted by the total page count in header and
    /// footer text during the close replay.
    pub fn set_page_alias(&mut self, alias: &str) {
        self.page_alias = Some(alias.to_string());
    }

    /// Select the current font. An empty family keeps the current one.
    pub fn set_font(&mut self, family: &str, style: FontStyle) -> Result<()> {
        if !family.is_empty() {
            self.font.family = family.to_string();
        }
        self.font.style = style;
        self.canvas
            .set_font(&self.font.family, self.font.style, self.font.size)
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<()> {
        self.font.size = size;
        self.canvas
            .set_font(&self.font.family, self.font.style, self.font.size)
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    pub fn set_draw_color(&mut self, color: Color) {
        self.stroke_color = color;
        self.canvas.set_stroke_color(color);
    }

    /// Stroke width in user units.
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = self.space().length(width);
        self.canvas.set_line_width(self.line_width);
    }

    // ── Snapshots ───────────────────────────────────────────────

    fn snapshot(&self) -> GraphicsSnapshot {
        GraphicsSnapshot {
            page_width: self.page_width,
            page_height: self.page_height,
            margins: self.margins,
            line_width: self.line_width,
            font: self.font.clone(),
            text_color: self.text_color,
            fill_color: self.fill_color,
            stroke_color: self.stroke_color,
        }
    }

    fn restore_snapshot(&mut self, snap: &GraphicsSnapshot) -> Result<()> {
        self.page_width = snap.page_width;
        self.page_height = snap.page_height;
        self.margins = snap.margins;
        self.line_width = snap.line_width;
        self.font = snap.font.clone();
        self.text_color = snap.text_color;
        self.fill_color = snap.fill_color;
        self.stroke_color = snap.stroke_color;
        self.canvas.set_line_width(snap.line_width);
        self.canvas.set_stroke_color(snap.stroke_color);
        self.canvas
            .set_font(&self.font.family, self.font.style, self.font.size)
    }

    // ── Page breaks ─────────────────────────────────────────────

    /// The page-break decision: may a break be taken right now?
    ///
    /// Breaks never happen during the header dry-run or the close replay.
    /// Otherwise the accept hook decides; without one, the auto flag does.
    fn page_break_ok(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Active || !self.mode.commits() {
            return false;
        }
        match self.hooks.accept_break.take() {
            Some(mut hook) => {
                let accept = hook(self);
                if self.hooks.accept_break.is_none() {
                    self.hooks.accept_break = Some(hook);
                }
                accept
            }
            None => self.auto_page_break,
        }
    }

    /// Break to a new page if `needed` points of height no longer fit above
    /// the bottom margin. Returns whether a break happened.
    pub(crate) fn maybe_break(&mut self, needed: f64) -> Result<bool> {
        if self.cursor.1 < self.margins.bottom + needed && self.page_break_ok() {
            log::debug!(
                "page break: cursor_y {:.2} cannot fit {:.2} above bottom margin {:.2}",
                self.cursor.1,
                needed,
                self.margins.bottom
            );
            self.add_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    // ── Page lifecycle ──────────────────────────────────────────

    /// Start a new page with the current defaults.
    pub fn add_page(&mut self) -> Result<()> {
        self.add_page_with(None, None)
    }

    /// Start a new page, optionally overriding orientation and size. The
    /// overrides become the defaults for subsequent pages.
    pub fn add_page_with(
        &mut self,
        orientation: Option<Orientation>,
        size: Option<PageSize>,
    ) -> Result<()> {
        if self.lifecycle == Lifecycle::Active {
            // Graphics state at the end of the outgoing page, for its footer.
            self.pre_footer
                .insert(self.canvas.page_number(), self.snapshot());
        }

        if let Some(o) = orientation {
            self.orientation = o;
        }
        if let Some(s) = size {
            self.page_size = s;
        }
        let (width, height) = self.page_size.oriented(self.orientation);
        self.canvas.create_page(width, height);
        self.page_width = width;
        self.page_height = height;
        self.cursor = (self.margins.left, height - self.margins.top);

        if self.lifecycle == Lifecycle::Deferred {
            // First page: freeze the pending defaults into the canvas.
            self.canvas
                .set_font(&self.font.family, self.font.style, self.font.size)?;
            self.canvas.set_line_width(self.line_width);
            self.canvas.set_stroke_color(self.stroke_color);
            self.lifecycle = Lifecycle::Active;
        }

        let page = self.canvas.page_number();
        log::debug!("page {page} started ({width:.2} x {height:.2} pt)");
        self.pre_header.insert(page, self.snapshot());

        // Dry-run the header for its height. The snapshot restore undoes any
        // state changes, but the cursor movement survives: that is the
        // reserved header space. The real drawing happens at close.
        let initial = self.snapshot();
        self.mode = LayoutMode::Measuring;
        let ran = self.run_header();
        self.mode = LayoutMode::Committing;
        self.restore_snapshot(&initial)?;
        ran
    }

    /// Finish the document: replay headers, footers, and internal links for
    /// every page, now that the total page count is known. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Closed | Lifecycle::Replay => return Ok(()),
            Lifecycle::Deferred => {
                self.lifecycle = Lifecycle::Closed;
                return Ok(());
            }
            Lifecycle::Active => {}
        }

        // Every allocated link must be complete before anything is emitted,
        // so a failure cannot leave half the annotations placed.
        if let Some(id) = self.links.first_incomplete() {
            return Err(FolioError::UnresolvedLink(id));
        }

        self.pre_footer
            .insert(self.canvas.page_number(), self.snapshot());

        let total = self.canvas.page_count();
        log::debug!("closing: replaying headers/footers across {total} pages");
        self.lifecycle = Lifecycle::Replay;
        self.alias_active = self.page_alias.is_some();

        for page in 1..=total {
            self.canvas.go_to_page(page);

            let pre_header = self.pre_header[&page].clone();
            self.restore_snapshot(&pre_header)?;
            self.cursor = (self.margins.left, self.page_height - self.margins.top);
            self.run_header()?;

            let pre_footer = self.pre_footer[&page].clone();
            self.restore_snapshot(&pre_footer)?;
            self.cursor = (0.0, 0.0);
            self.run_footer()?;

            for id in self.links.on_page(page).to_vec() {
                let (rect, dest) = self.links.resolve(id)?;
                log::trace!("emitting link {id} on page {page}");
                self.canvas.register_link(
                    rect,
                    LinkTarget::Destination {
                        page: dest.page,
                        y: dest.y,
                    },
                );
            }
        }

        self.alias_active = false;
        self.lifecycle = Lifecycle::Closed;
        Ok(())
    }

    /// Close if necessary, then serialize through the canvas.
    pub fn output(&mut self, out: &mut dyn Write) -> Result<()> {
        self.close()?;
        self.canvas.render(&self.metadata, out)
    }

    /// Close if necessary, then serialize to a file.
    pub fn output_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        self.output(&mut file)
    }

    /// Hand the canvas back, consuming the document. Useful for inspecting a
    /// recording backend after close.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    // ── Links ───────────────────────────────────────────────────

    /// Allocate a link identifier. Its rectangle is assigned by attaching it
    /// to a drawing call; its destination by one of the `set_link` calls.
    /// Both must happen, in any order, before close.
    pub fn add_link(&mut self) -> LinkId {
        self.links.allocate()
    }

    /// Point `id` at the top of the current page.
    pub fn set_link(&mut self, id: LinkId) {
        let page = self.canvas.page_number();
        self.set_link_to(id, 0.0, page);
    }

    /// Point `id` at `y` (user units) on the current page.
    pub fn set_link_at(&mut self, id: LinkId, y: f64) {
        let page = self.canvas.page_number();
        self.set_link_to(id, y, page);
    }

    /// Point `id` at `y` (user units) on `page`.
    pub fn set_link_to(&mut self, id: LinkId, y: f64, page: usize) {
        let y = self.space().native_y(y);
        self.links.set_destination(id, Destination { page, y });
    }

    /// Make an explicit rectangle (user units) clickable.
    pub fn link_area(&mut self, x: f64, y: f64, w: f64, h: f64, link: &LinkRef) -> Result<()> {
        self.require_page()?;
        let s = self.space();
        let rect = Rect::new(s.native_x(x), s.native_y(y), s.length(w), s.length(h));
        self.place_link(rect, link);
        Ok(())
    }

    /// Register a link rectangle in native coordinates. URL links go to the
    /// canvas immediately; internal ones wait for the close replay.
    pub(crate) fn place_link(&mut self, rect: Rect, link: &LinkRef) {
        if !self.mode.commits() {
            return;
        }
        match link {
            LinkRef::Url(url) => self
                .canvas
                .register_link(rect, LinkTarget::Url(url.clone())),
            LinkRef::Id(id) => self.links.place(*id, self.canvas.page_number(), rect),
        }
    }

    // ── Plain drawing primitives ────────────────────────────────

    /// Stroke a line between two points in user coordinates.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.require_page()?;
        if self.mode.commits() {
            let s = self.space();
            self.canvas
                .stroke_line((s.native_x(x1), s.native_y(y1)), (s.native_x(x2), s.native_y(y2)));
        }
        Ok(())
    }

    /// Stroke and/or fill a rectangle given in user coordinates.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: RectStyle) -> Result<()> {
        self.require_page()?;
        if self.mode.commits() {
            let s = self.space();
            let r = Rect::new(s.native_x(x), s.native_y(y), s.length(w), s.length(h));
            if matches!(style, RectStyle::Fill | RectStyle::StrokeFill) {
                self.canvas.set_fill_color(self.fill_color);
                self.canvas.fill_rect(r);
            }
            if matches!(style, RectStyle::Stroke | RectStyle::StrokeFill) {
                self.canvas.stroke_rect(r);
            }
        }
        Ok(())
    }

    /// Raw text at a baseline position in user coordinates. No wrapping, no
    /// cursor movement.
    pub fn text(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        self.require_page()?;
        if self.mode.commits() {
            let s = self.space();
            let txt = self.substituted(text);
            self.canvas.set_fill_color(self.text_color);
            self.canvas.draw_text((s.native_x(x), s.native_y(y)), &txt);
        }
        Ok(())
    }

    /// Place an image. Extents derive from the intrinsic size when missing;
    /// when no explicit Y is given, the image participates in automatic page
    /// breaking and is placed at the cursor.
    pub fn image(&mut self, source: &ImageSource, opts: &ImageOptions) -> Result<()> {
        self.require_page()?;
        let mut w = opts.width.map(|v| self.space().length(v)).filter(|v| *v > 0.0);
        let mut h = opts.height.map(|v| self.space().length(v)).filter(|v| *v > 0.0);

        if w.is_none() || h.is_none() {
            let (iw, ih) = self.canvas.image_size(source)?;
            match (w, h) {
                (None, None) => {
                    w = Some(iw);
                    h = Some(ih);
                }
                (Some(wv), None) => h = Some(wv * ih / iw),
                (None, Some(hv)) => w = Some(hv * iw / ih),
                (Some(_), Some(_)) => {}
            }
        }
        let (w, h) = (w.unwrap_or(0.0), h.unwrap_or(0.0));

        if opts.y.is_none() {
            self.maybe_break(h)?;
        }

        if self.mode.commits() {
            let s = self.space();
            let x = opts.x.map(|v| s.native_x(v)).unwrap_or(self.cursor.0);
            let y = opts.y.map(|v| s.native_y(v)).unwrap_or(self.cursor.1);
            self.canvas.draw_image(source, (x, y), w, h)?;
            if let Some(link) = opts.link.clone() {
                self.place_link(Rect::new(x, y, w, h), &link);
            }
        }
        Ok(())
    }
}
