//! # Link Registry
//!
//! The legacy API allows very flexible timing around links: an identifier is
//! allocated first, and its target rectangle and destination may be assigned
//! independently, in any order, possibly on different pages. URL links need
//! none of that and are emitted the moment they are placed; internal links
//! are held here and emitted during the close replay, when every target
//! page exists.

use std::collections::HashMap;
use std::fmt;

use crate::error::{FolioError, Result};
use crate::geometry::Rect;

/// Opaque handle to an internal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub(crate) usize);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A link attached to a drawing call: either an external URL, emitted the
/// moment the drawing lands, or an allocated identifier resolved at close.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkRef {
    Url(String),
    Id(LinkId),
}

impl LinkRef {
    pub fn url(url: impl Into<String>) -> Self {
        LinkRef::Url(url.into())
    }
}

impl From<LinkId> for LinkRef {
    fn from(id: LinkId) -> Self {
        LinkRef::Id(id)
    }
}

/// A destination inside the document: a page and a native Y coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub page: usize,
    pub y: f64,
}

/// Everything known about one allocated link.
///
/// A link is complete when it has a rectangle and a destination. Both halves
/// arrive through separate calls; `rect` through a drawing call that carries
/// the link, `dest` through `set_link`.
#[derive(Debug, Clone, Default)]
pub struct LinkInfo {
    pub rect: Option<Rect>,
    pub dest: Option<Destination>,
}

impl LinkInfo {
    pub fn is_complete(&self) -> bool {
        self.rect.is_some() && self.dest.is_some()
    }
}

/// Tracks allocated links, their rectangles and destinations, and which page
/// each placed link belongs to.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    links: Vec<LinkInfo>,
    by_page: HashMap<usize, Vec<LinkId>>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh link identifier with no rectangle or destination.
    pub fn allocate(&mut self) -> LinkId {
        self.links.push(LinkInfo::default());
        LinkId(self.links.len() - 1)
    }

    /// Assign the destination. Later assignments overwrite earlier ones.
    pub fn set_destination(&mut self, id: LinkId, dest: Destination) {
        self.links[id.0].dest = Some(dest);
    }

    /// Record the target rectangle and the page the link was placed on.
    pub fn place(&mut self, id: LinkId, page: usize, rect: Rect) {
        self.links[id.0].rect = Some(rect);
        self.by_page.entry(page).or_default().push(id);
    }

    pub fn get(&self, id: LinkId) -> &LinkInfo {
        &self.links[id.0]
    }

    /// The links placed on `page`, in placement order.
    pub fn on_page(&self, page: usize) -> &[LinkId] {
        self.by_page.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve one link for emission, failing if it never became complete.
    pub fn resolve(&self, id: LinkId) -> Result<(Rect, Destination)> {
        let info = &self.links[id.0];
        match (info.rect, info.dest) {
            (Some(rect), Some(dest)) => Ok((rect, dest)),
            _ => Err(FolioError::UnresolvedLink(id)),
        }
    }

    /// The first link that is not yet complete, if any. Checked up front at
    /// close so a failure cannot leave half the annotations emitted.
    pub fn first_incomplete(&self) -> Option<LinkId> {
        self.links
            .iter()
            .position(|l| !l.is_complete())
            .map(LinkId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(10.0, 800.0, 100.0, 12.0)
    }

    #[test]
    fn assignment_in_either_order_completes() {
        let mut reg = LinkRegistry::new();

        let a = reg.allocate();
        reg.place(a, 1, rect());
        reg.set_destination(a, Destination { page: 2, y: 700.0 });
        assert!(reg.get(a).is_complete());

        let b = reg.allocate();
        reg.set_destination(b, Destination { page: 1, y: 500.0 });
        reg.place(b, 2, rect());
        assert!(reg.get(b).is_complete());
    }

    #[test]
    fn destination_without_rect_is_unresolved() {
        let mut reg = LinkRegistry::new();
        let id = reg.allocate();
        reg.set_destination(id, Destination { page: 1, y: 0.0 });
        assert!(reg.resolve(id).is_err());
        assert_eq!(reg.first_incomplete(), Some(id));
    }

    #[test]
    fn page_lists_keep_placement_order() {
        let mut reg = LinkRegistry::new();
        let a = reg.allocate();
        let b = reg.allocate();
        reg.place(b, 1, rect());
        reg.place(a, 1, rect());
        assert_eq!(reg.on_page(1), &[b, a]);
        assert!(reg.on_page(2).is_empty());
    }
}
