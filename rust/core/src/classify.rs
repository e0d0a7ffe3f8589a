// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Page classification and selection.
//!
//! Drawing sets usually open with a cover sheet and bury the one useful
//! wide 3D perspective somewhere in the middle. The classifier scans each
//! page's extracted text for title-block keywords and ranks perspective
//! sheets first so the model sees the primary visual anchor immediately.
//!
//! The keyword heuristic is a tunable policy, not a contract: real-world
//! title blocks misclassify in both directions, which is why manual
//! selection always remains available on top of the ranking.

use serde::{Deserialize, Serialize};

/// What a page appears to show, judged from its text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCategory {
    /// Wide 3D perspective or rendered sketch.
    Perspective,
    /// Straight-on elevation or named view.
    Elevation,
    /// Everything else: plans, schedules, notes, cover sheets.
    Other,
}

/// Classify a single page from its extracted text.
pub fn classify_page(text: &str) -> PageCategory {
    let text = text.to_lowercase();
    if text.contains("perspective") || text.contains("3d") {
        PageCategory::Perspective
    } else if text.contains("elevation") || text.contains("view") {
        PageCategory::Elevation
    } else {
        PageCategory::Other
    }
}

/// Rank pages for submission: perspectives first, then elevations, then the
/// remainder, each bucket preserving source page order.
///
/// Only the first `scan_limit` pages are considered and the result is
/// truncated to `cap`. Returned indices are 0-based positions into `texts`.
pub fn rank_pages(texts: &[String], scan_limit: usize, cap: usize) -> Vec<usize> {
    let mut perspectives = Vec::new();
    let mut elevations = Vec::new();
    let mut others = Vec::new();

    for (index, text) in texts.iter().take(scan_limit).enumerate() {
        match classify_page(text) {
            PageCategory::Perspective => perspectives.push(index),
            PageCategory::Elevation => elevations.push(index),
            PageCategory::Other => others.push(index),
        }
    }

    let mut ranked = perspectives;
    ranked.extend(elevations);
    ranked.extend(others);
    ranked.truncate(cap);
    ranked
}

/// User-driven page selection, in click order.
///
/// The ordering is load-bearing: the last selected page is the master view
/// whose camera framing the generated render must match, and that position
/// is preserved all the way to submission. The selection is never empty;
/// deselecting the final remaining page is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelection {
    order: Vec<usize>,
}

impl PageSelection {
    /// Start with the first page selected.
    pub fn new() -> Self {
        Self { order: vec![0] }
    }

    /// Toggle a page in or out of the selection. Returns `true` if the
    /// selection changed.
    pub fn toggle(&mut self, index: usize) -> bool {
        if let Some(position) = self.order.iter().position(|&i| i == index) {
            if self.order.len() == 1 {
                return false;
            }
            self.order.remove(position);
        } else {
            // Newly selected pages append, so the most recent click is the
            // master view.
            self.order.push(index);
        }
        true
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.order.contains(&index)
    }

    /// Selected page indices in submission order (master view last).
    pub fn submission_order(&self) -> &[usize] {
        &self.order
    }

    /// The page whose geometry and camera the render must match.
    pub fn master(&self) -> usize {
        *self.order.last().expect("selection is never empty")
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for PageSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(pages: &[&str]) -> Vec<String> {
        pages.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyword_pages_rank_first() {
        // Page 3 carries a perspective marker, page 5 an elevation marker
        // (1-based); expected order is [3, 5, 1, 2, 4].
        let pages = texts(&[
            "COVER SHEET",
            "GENERAL NOTES",
            "KITCHEN PERSPECTIVE SK-1",
            "FLOOR PLAN",
            "NORTH ELEVATION",
        ]);
        assert_eq!(rank_pages(&pages, 30, 12), vec![2, 4, 0, 1, 3]);
    }

    #[test]
    fn ranking_truncates_to_cap() {
        let pages = texts(&["perspective", "notes", "elevation", "plan", "3d view"]);
        assert_eq!(rank_pages(&pages, 30, 2), vec![0, 4]);
    }

    #[test]
    fn scan_limit_bounds_the_pages_considered() {
        let pages = texts(&["notes", "notes", "perspective"]);
        // The perspective page sits past the scan limit and is never seen.
        assert_eq!(rank_pages(&pages, 2, 12), vec![0, 1]);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify_page("ISLAND PERSPECTIVE"), PageCategory::Perspective);
        assert_eq!(classify_page("West Elevation"), PageCategory::Elevation);
        assert_eq!(classify_page("schedule"), PageCategory::Other);
    }

    #[test]
    fn last_selected_page_is_never_removed() {
        let mut selection = PageSelection::new();
        assert!(!selection.toggle(0));
        assert_eq!(selection.submission_order(), &[0]);

        // Arbitrary toggle sequences keep the invariant.
        for i in [3, 1, 3, 0, 1, 0, 0] {
            selection.toggle(i);
            assert!(!selection.submission_order().is_empty());
        }
    }

    #[test]
    fn selection_order_follows_clicks_master_last() {
        let mut selection = PageSelection::new();
        selection.toggle(4);
        selection.toggle(2);
        assert_eq!(selection.submission_order(), &[0, 4, 2]);
        assert_eq!(selection.master(), 2);

        // Re-selecting an earlier page after removal moves it to the end.
        selection.toggle(4);
        selection.toggle(4);
        assert_eq!(selection.submission_order(), &[0, 2, 4]);
        assert_eq!(selection.master(), 4);
    }
}
