use super::FlatCommentRow;

/// Per-row "user collapsed this comment" flags, aligned with the flattened rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    flags: Vec<bool>,
}

impl CollapseState {
    /// All rows expanded.
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Re-initialize to all-expanded for a freshly fetched thread.
    pub fn reset(&mut self, len: usize) {
        self.flags.clear();
        self.flags.resize(len, false);
    }

    /// Flip the flag of row `index`. Returns the new value.
    ///
    /// Out-of-range indices are ignored and return `false`.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                *flag
            }
            None => false,
        }
    }

    /// Set row `index` collapsed. Returns true if the flag changed.
    pub fn collapse(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_collapsed(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

/// A flattened row with its projected visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCommentRow<'a> {
    pub row: &'a FlatCommentRow,
    /// The row's own flag, kept even while the row is hidden.
    pub collapsed: bool,
    /// True when a collapsed strict ancestor hides this row.
    pub hidden: bool,
}

/// Project collapse flags onto flattened rows.
///
/// One pass, one piece of state: the depth at which the active collapse scope
/// was opened. Pre-order guarantees a collapsed row's subtree is exactly the
/// run of following rows deeper than it, so the scope ends as soon as the
/// traversal returns to that depth or above. Flags of rows already hidden by
/// an ancestor do not open a new scope.
///
/// # Panics
///
/// Panics if `rows` and `flags` differ in length. The flags must come from a
/// [`CollapseState`] built for exactly these rows.
pub fn project<'a>(rows: &'a [FlatCommentRow], flags: &[bool]) -> Vec<VisibleCommentRow<'a>> {
    assert_eq!(
        rows.len(),
        flags.len(),
        "collapse flags must align 1:1 with thread rows"
    );

    let mut scope_depth: Option<usize> = None;

    rows.iter()
        .zip(flags.iter().copied())
        .map(|(row, collapsed)| {
            if scope_depth.is_some_and(|d| row.depth <= d) {
                scope_depth = None;
            }

            let hidden = scope_depth.is_some_and(|d| row.depth > d);

            if scope_depth.is_none() && collapsed {
                scope_depth = Some(row.depth);
            }

            VisibleCommentRow {
                row,
                collapsed,
                hidden,
            }
        })
        .collect()
}
