use super::{flatten, project, CollapseState, FlatCommentRow, VisibleCommentRow};
use crate::hn::CommentNode;

/// Flattened comment thread with its collapse flags.
///
/// Rows are computed once per fetched story. Every flag change re-projects
/// visibility and caches the indices of rows that are not hidden, which is
/// what the list widget and cursor movement operate on.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    story_id: u64,
    rows: Vec<FlatCommentRow>,
    collapse: CollapseState,
    visible: Vec<usize>,
}

impl CommentThread {
    /// Build a thread for `story_id` with every comment expanded.
    pub fn new(story_id: u64, comments: &[CommentNode]) -> Self {
        let rows = flatten(comments);
        let collapse = CollapseState::new(rows.len());
        let mut thread = Self {
            story_id,
            rows,
            collapse,
            visible: Vec::new(),
        };
        thread.refresh_visible();
        thread
    }

    pub fn story_id(&self) -> u64 {
        self.story_id
    }

    pub fn rows(&self) -> &[FlatCommentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapse
    }

    /// Project the current flags onto every row.
    pub fn project(&self) -> Vec<VisibleCommentRow<'_>> {
        project(&self.rows, self.collapse.as_slice())
    }

    /// Row indices that are currently shown, in display order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Position of `row` within [`visible_indices`](Self::visible_indices).
    pub fn visible_position(&self, row: usize) -> Option<usize> {
        self.visible.binary_search(&row).ok()
    }

    /// Flip the collapse flag of `row` and re-project. Returns the new flag.
    pub fn toggle(&mut self, row: usize) -> bool {
        let collapsed = self.collapse.toggle(row);
        self.refresh_visible();
        tracing::debug!(
            story_id = self.story_id,
            row,
            collapsed,
            visible = self.visible.len(),
            "Toggled comment collapse"
        );
        collapsed
    }

    /// Nearest row above `row` with a smaller depth.
    pub fn parent_of(&self, row: usize) -> Option<usize> {
        let depth = self.rows.get(row)?.depth;
        self.rows[..row].iter().rposition(|r| r.depth < depth)
    }

    /// The top-level row whose thread contains `row`.
    pub fn root_of(&self, row: usize) -> Option<usize> {
        self.rows.get(row)?;
        self.rows[..=row].iter().rposition(|r| r.depth == 0)
    }

    /// First top-level row after `row`.
    pub fn next_root_after(&self, row: usize) -> Option<usize> {
        let start = row.checked_add(1)?;
        self.rows
            .get(start..)?
            .iter()
            .position(|r| r.depth == 0)
            .map(|offset| start + offset)
    }

    /// Collapse the top-level thread containing `row` and return the next
    /// top-level row to move the cursor to.
    ///
    /// An already-collapsed root stays collapsed. Returns `None` when `row`
    /// belongs to the last thread.
    pub fn collapse_thread_and_advance(&mut self, row: usize) -> Option<usize> {
        let root = self.root_of(row)?;
        if self.collapse.collapse(root) {
            self.refresh_visible();
        }
        self.next_root_after(root)
    }

    fn refresh_visible(&mut self) {
        self.visible = self
            .project()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.hidden)
            .map(|(i, _)| i)
            .collect();
    }
}
