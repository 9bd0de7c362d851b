//! Heading context for positions inside a document.
//!
//! A [`HeadingStack`] is a snapshot of the headings open at some point of
//! a page, one slot per level. Opening a heading yields a new snapshot
//! with that slot set and every deeper slot cleared; snapshots are never
//! mutated, so sweeping a page is a plain fold over its positions.

use crate::html::{Heading, MAX_HEADING_LEVEL};

/// Separator used when a heading stack is rendered as a path.
pub const PATH_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingStack {
    slots: [Option<String>; MAX_HEADING_LEVEL],
}

impl HeadingStack {
    /// Snapshot after `heading` has been opened.
    ///
    /// Levels outside `1..=MAX_HEADING_LEVEL` leave the stack unchanged.
    pub fn open(&self, heading: &Heading) -> Self {
        if heading.level == 0 || heading.level > MAX_HEADING_LEVEL {
            return self.clone();
        }
        let idx = heading.level - 1;
        let mut slots = self.slots.clone();
        slots[idx] = Some(heading.text.clone());
        for slot in slots.iter_mut().skip(idx + 1) {
            *slot = None;
        }
        Self { slots }
    }

    /// Open every heading in `pending` that starts at or before `offset`.
    ///
    /// Returns the new snapshot and how many headings were consumed.
    /// `pending` must be sorted by offset.
    pub fn advance(&self, pending: &[Heading], offset: usize) -> (Self, usize) {
        let consumed =
            pending.iter().take_while(|h| h.offset <= offset).count();
        let stack = pending[..consumed]
            .iter()
            .fold(self.clone(), |stack, heading| stack.open(heading));
        (stack, consumed)
    }

    /// Open headings, outermost first.
    pub fn headings(&self) -> Vec<String> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// The level-1 heading, if one is open.
    pub fn top(&self) -> Option<&str> {
        self.slots[0].as_deref()
    }

    pub fn context(&self) -> HeadingContext {
        let headings = self.headings();
        HeadingContext {
            heading_path: headings.join(PATH_SEPARATOR),
            headings,
            section: self.top().map(str::to_string),
        }
    }
}

/// Heading context assigned to one position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingContext {
    pub headings: Vec<String>,
    pub heading_path: String,
    pub section: Option<String>,
}

/// Assign heading context to each of `positions` (ascending offsets).
///
/// Headings and positions share one coordinate space; a heading applies
/// to every position at or after its offset until a heading of the same
/// or a shallower level replaces it.
pub fn assign(headings: &[Heading], positions: &[usize]) -> Vec<HeadingContext> {
    let (_, _, contexts) = positions.iter().fold(
        (HeadingStack::default(), 0usize, Vec::with_capacity(positions.len())),
        |(stack, next, mut contexts), &offset| {
            let (stack, consumed) = stack.advance(&headings[next..], offset);
            contexts.push(stack.context());
            (stack, next + consumed, contexts)
        },
    );
    contexts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: usize, text: &str, offset: usize) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            offset,
        }
    }

    #[test]
    fn shallower_heading_clears_deeper_slots() {
        let headings = [h(1, "A", 0), h(2, "B", 10), h(1, "C", 30)];
        let contexts = assign(&headings, &[20, 40]);

        assert_eq!(contexts[0].heading_path, "A / B");
        assert_eq!(contexts[0].section.as_deref(), Some("A"));
        assert_eq!(contexts[1].heading_path, "C");
        assert_eq!(contexts[1].headings, vec!["C".to_string()]);
    }

    #[test]
    fn sibling_replaces_same_level() {
        let headings =
            [h(1, "A", 0), h(2, "B", 10), h(3, "B1", 20), h(2, "D", 30)];
        let contexts = assign(&headings, &[25, 35]);

        assert_eq!(contexts[0].heading_path, "A / B / B1");
        assert_eq!(contexts[1].heading_path, "A / D");
    }

    #[test]
    fn positions_before_any_heading_are_empty() {
        let contexts = assign(&[h(1, "A", 50)], &[10, 60]);
        assert_eq!(contexts[0], HeadingContext::default());
        assert_eq!(contexts[1].heading_path, "A");
    }

    #[test]
    fn deeper_heading_without_parent() {
        let contexts = assign(&[h(2, "Orphan", 0)], &[5]);
        assert_eq!(contexts[0].heading_path, "Orphan");
        assert_eq!(contexts[0].section, None);
    }

    #[test]
    fn open_does_not_touch_the_original() {
        let base = HeadingStack::default().open(&h(1, "A", 0));
        let next = base.open(&h(1, "C", 5));
        assert_eq!(base.headings(), vec!["A".to_string()]);
        assert_eq!(next.headings(), vec!["C".to_string()]);
    }

    #[test]
    fn open_headings_persist_as_prefix() {
        let headings = [
            h(1, "A", 0),
            h(2, "B", 10),
            h(3, "x", 20),
            h(3, "y", 40),
            h(2, "C", 60),
        ];
        let contexts = assign(&headings, &[15, 25, 45, 65]);
        for pair in contexts.windows(2) {
            let prev = &pair[0].headings;
            let next = &pair[1].headings;
            assert_eq!(prev[0], next[0], "level-1 heading stays open");
        }
        assert!(contexts[2].headings.starts_with(&contexts[0].headings));
    }
}
