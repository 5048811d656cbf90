// SPDX-License-Identifier: AGPL-3.0-or-later
//! Nested-list bookkeeping across the recursive walk

/// Indentation per nesting level, in twips
pub(crate) const INDENT_PER_LEVEL: u32 = 720;

/// Hanging indent for the marker run, in twips
pub(crate) const HANGING_INDENT: u32 = 360;

/// State for one list nesting level.
///
/// `depth` is the stack height at push time and stays fixed for the
/// context's lifetime, so an outer list keeps its indentation while inner
/// lists come and go.
#[derive(Debug, Clone, Copy)]
pub struct ListContext {
    pub ordered: bool,
    pub index: u32,
    pub depth: usize,
}

/// Marker data for one list item, computed when the item is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMarker {
    pub ordered: bool,
    pub ordinal: u32,
    pub indent_twips: u32,
}

impl ItemMarker {
    /// Marker text placed as the first run of the item paragraph
    pub fn text(&self) -> String {
        if self.ordered {
            format!("{}. ", self.ordinal)
        } else {
            "\u{2022} ".to_string()
        }
    }
}

/// Stack of active list contexts
#[derive(Debug, Default)]
pub struct ListStack {
    contexts: Vec<ListContext>,
}

impl ListStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ordered: bool) {
        let depth = self.contexts.len();
        self.contexts.push(ListContext {
            ordered,
            index: 0,
            depth,
        });
    }

    /// Pop the innermost context; a pop on an empty stack is a no-op
    pub fn pop(&mut self) {
        self.contexts.pop();
    }

    /// Advance the innermost item counter and compute the item marker.
    ///
    /// Returns `None` when no list context is active, which callers treat
    /// as a structural anomaly to skip, not a fault.
    pub fn enter_item(&mut self) -> Option<ItemMarker> {
        let ctx = self.contexts.last_mut()?;
        ctx.index += 1;
        Some(ItemMarker {
            ordered: ctx.ordered,
            ordinal: ctx.index,
            indent_twips: (ctx.depth as u32 + 1) * INDENT_PER_LEVEL,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_indices_are_per_level() {
        let mut stack = ListStack::new();
        stack.push(true);
        assert_eq!(stack.enter_item().unwrap().ordinal, 1);
        // Inner list restarts at 1 and does not disturb the outer counter
        stack.push(true);
        assert_eq!(stack.enter_item().unwrap().ordinal, 1);
        assert_eq!(stack.enter_item().unwrap().ordinal, 2);
        stack.pop();
        assert_eq!(stack.enter_item().unwrap().ordinal, 2);
    }

    #[test]
    fn test_indent_grows_with_depth() {
        let mut stack = ListStack::new();
        stack.push(false);
        let outer = stack.enter_item().unwrap();
        stack.push(false);
        let inner = stack.enter_item().unwrap();
        assert!(inner.indent_twips > outer.indent_twips);
        assert_eq!(outer.indent_twips, INDENT_PER_LEVEL);
        assert_eq!(inner.indent_twips, 2 * INDENT_PER_LEVEL);
    }

    #[test]
    fn test_marker_text() {
        let ordered = ItemMarker {
            ordered: true,
            ordinal: 3,
            indent_twips: 720,
        };
        assert_eq!(ordered.text(), "3. ");
        let bullet = ItemMarker {
            ordered: false,
            ordinal: 1,
            indent_twips: 720,
        };
        assert_eq!(bullet.text(), "\u{2022} ");
    }

    #[test]
    fn test_empty_stack_is_tolerated() {
        let mut stack = ListStack::new();
        stack.pop();
        assert!(stack.enter_item().is_none());
    }
}
