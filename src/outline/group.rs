//! Per-group tree algorithms: fuzzy-match propagation, enclosing-position
//! lookup and marker attachment.

use crate::document::Position;
use crate::fuzzy::{FuzzyScore, Scorer};
use crate::markers::{Marker, MarkerSummary};

use super::tree::{NodeIdx, OutlineTree};

impl OutlineTree {
    /// Score every element of `group` against `pattern`, threading the best
    /// match found so far.
    pub fn update_group_matches(
        &mut self,
        group: NodeIdx,
        pattern: &str,
        scorer: &dyn Scorer,
        mut top_match: Option<NodeIdx>,
    ) -> Option<NodeIdx> {
        for child in self.child_indices(group) {
            top_match = self.update_matches_in(child, pattern, scorer, top_match);
        }
        top_match
    }

    fn update_matches_in(
        &mut self,
        item: NodeIdx,
        pattern: &str,
        scorer: &dyn Scorer,
        mut top_match: Option<NodeIdx>,
    ) -> Option<NodeIdx> {
        let Some(element) = self.element_mut(item) else {
            return top_match;
        };
        element.score = scorer.score(pattern, &element.symbol.name);
        let value = element.score.as_ref().map(|score| score.value);

        if let Some(value) = value {
            // Strictly greater: on equal scores the first one evaluated stays
            let beats_top = match top_match.and_then(|top| self.node(top).score()) {
                Some(top) => value > top.value,
                None => true,
            };
            if beats_top {
                top_match = Some(item);
            }
        }

        for child in self.child_indices(item) {
            top_match = self.update_matches_in(child, pattern, scorer, top_match);

            // Keep ancestors of a match visible without giving them rank
            if self.node(item).score().is_none() && self.node(child).score().is_some() {
                if let Some(element) = self.element_mut(item) {
                    element.score = Some(FuzzyScore::default());
                }
            }
        }

        top_match
    }

    /// Deepest element of `group` whose range contains `position`.
    ///
    /// Only the first containing child is explored at each level.
    pub fn group_item_enclosing_position(
        &self,
        group: NodeIdx,
        position: Position,
    ) -> Option<NodeIdx> {
        for &child in self.node(group).children().values() {
            let Some(element) = self.node(child).as_element() else {
                continue;
            };
            if !element.symbol.defining_range().contains_position(position) {
                continue;
            }
            return Some(
                self.group_item_enclosing_position(child, position)
                    .unwrap_or(child),
            );
        }
        None
    }

    /// Attach `markers` (sorted by start) to the elements of `group`
    pub fn update_group_markers(&mut self, group: NodeIdx, markers: &[Marker]) {
        let mut pool = markers.to_vec();
        for child in self.child_indices(group) {
            self.update_markers_in(child, &mut pool);
        }
    }

    fn update_markers_in(&mut self, item: NodeIdx, pool: &mut Vec<Marker>) {
        let Some(element) = self.element_mut(item) else {
            return;
        };
        element.marker = None;
        let range = element.symbol.defining_range();

        let (mut claimed, rest): (Vec<Marker>, Vec<Marker>) = std::mem::take(pool)
            .into_iter()
            .partition(|marker| marker.range.intersects(&range));
        *pool = rest;

        let top_severity = claimed.iter().map(|marker| marker.severity).max();

        // Children take what they can; the rest stays on this element
        for child in self.child_indices(item) {
            self.update_markers_in(child, &mut claimed);
        }

        if let (Some(top_severity), Some(element)) = (top_severity, self.element_mut(item)) {
            element.marker = Some(MarkerSummary {
                count: claimed.len(),
                top_severity,
            });
        }
    }
}
