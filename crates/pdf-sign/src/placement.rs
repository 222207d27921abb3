//! Signature placements and the ledger of committed ones

use crate::layout::RelativeRect;
use std::collections::BTreeMap;

/// The signature currently being positioned. Never stored in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePlacement {
    pub page: usize,
    pub rect: RelativeRect,
}

impl ActivePlacement {
    /// A placement of the given relative size centred on `page`
    pub fn centered(page: usize, width: f64, height: f64) -> Self {
        let width = width.clamp(f64::EPSILON, 1.0);
        let height = height.clamp(f64::EPSILON, 1.0);
        Self {
            page,
            rect: RelativeRect::centered(width, height),
        }
    }

    /// Move so the top-left corner sits at (`x`, `y`), keeping the rect on the page.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.rect.x = x.clamp(0.0, (1.0 - self.rect.width).max(0.0));
        self.rect.y = y.clamp(0.0, (1.0 - self.rect.height).max(0.0));
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.move_to(self.rect.x + dx, self.rect.y + dy);
    }

    /// Change the size, keeping the top-left corner where it is.
    ///
    /// `aspect` is the signature's width/height in pixels and
    /// `page_aspect` the rendered page's width/height, so the on-screen
    /// shape matches the signature.
    pub fn resize_keep_aspect(&mut self, width: f64, aspect: f64, page_aspect: f64) {
        let width = width.clamp(f64::EPSILON, 1.0);
        let height = (width * page_aspect / aspect).clamp(f64::EPSILON, 1.0);
        self.rect.width = width;
        self.rect.height = height;
        self.move_to(self.rect.x, self.rect.y);
    }
}

/// A placement frozen into the ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommittedPlacement {
    pub page: usize,
    pub rect: RelativeRect,
}

impl From<ActivePlacement> for CommittedPlacement {
    fn from(active: ActivePlacement) -> Self {
        Self {
            page: active.page,
            rect: active.rect,
        }
    }
}

/// Committed placements in the order they were made.
///
/// Append-only while a document is open. Overlapping placements are
/// kept as separate stamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementLedger {
    placements: Vec<CommittedPlacement>,
}

impl PlacementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, placement: CommittedPlacement) {
        self.placements.push(placement);
    }

    /// Freeze `active` into the ledger, consuming it.
    pub fn commit(&mut self, active: ActivePlacement) -> &CommittedPlacement {
        self.placements.push(active.into());
        &self.placements[self.placements.len() - 1]
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    pub fn total_count(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn count_on_page(&self, page: usize) -> usize {
        self.placements.iter().filter(|p| p.page == page).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommittedPlacement> {
        self.placements.iter()
    }

    pub fn on_page(&self, page: usize) -> impl Iterator<Item = &CommittedPlacement> {
        self.placements.iter().filter(move |p| p.page == page)
    }

    /// Placements grouped by page, pages ascending, ledger order within a page
    pub fn group_by_page(&self) -> BTreeMap<usize, Vec<CommittedPlacement>> {
        let mut groups: BTreeMap<usize, Vec<CommittedPlacement>> = BTreeMap::new();
        for placement in &self.placements {
            groups.entry(placement.page).or_default().push(*placement);
        }
        groups
    }
}

impl FromIterator<CommittedPlacement> for PlacementLedger {
    fn from_iter<I: IntoIterator<Item = CommittedPlacement>>(iter: I) -> Self {
        Self {
            placements: iter.into_iter().collect(),
        }
    }
}
