use crate::hn::CommentNode;
use chrono::{DateTime, Utc};

/// A comment's own fields, without its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentData {
    pub id: u64,
    /// `None` for deleted comments.
    pub author: Option<String>,
    pub body_html: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&CommentNode> for CommentData {
    fn from(node: &CommentNode) -> Self {
        Self {
            id: node.id,
            author: node.author.clone(),
            body_html: node.body_html.clone(),
            created_at: node.created_at,
        }
    }
}

/// One comment in the flattened thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatCommentRow {
    pub comment: CommentData,
    /// Nesting depth; top-level comments are 0.
    pub depth: usize,
    /// Number of strict descendants (replies at any depth).
    pub descendant_count: usize,
}

/// Flatten a comment forest into pre-order rows.
///
/// Every node appears exactly once. A node's row is immediately followed by
/// the rows of its whole subtree, children in their original order, so all
/// strict descendants of row `i` sit between `i` and the next row whose depth
/// is `<= rows[i].depth`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hnr::hn::CommentNode;
/// use hnr::thread::flatten;
///
/// let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// let leaf = |id| CommentNode::new(id, at);
/// let forest = vec![CommentNode::new(1, at).with_children(vec![leaf(2), leaf(3)])];
///
/// let rows = flatten(&forest);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[0].descendant_count, 2);
/// assert_eq!(rows[2].depth, 1);
/// ```
pub fn flatten(roots: &[CommentNode]) -> Vec<FlatCommentRow> {
    let mut rows = Vec::with_capacity(count_nodes(roots));
    for root in roots {
        push_subtree(root, 0, &mut rows);
    }
    rows
}

fn push_subtree(node: &CommentNode, depth: usize, rows: &mut Vec<FlatCommentRow>) {
    let index = rows.len();
    rows.push(FlatCommentRow {
        comment: CommentData::from(node),
        depth,
        descendant_count: 0,
    });

    for child in &node.children {
        push_subtree(child, depth + 1, rows);
    }

    // Everything pushed after our own row belongs to our subtree.
    rows[index].descendant_count = rows.len() - index - 1;
}

fn count_nodes(nodes: &[CommentNode]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + count_nodes(&n.children))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn node(id: u64, children: Vec<CommentNode>) -> CommentNode {
        CommentNode::new(id, at()).with_children(children)
    }

    fn shape(rows: &[FlatCommentRow]) -> Vec<(u64, usize, usize)> {
        rows.iter()
            .map(|r| (r.comment.id, r.depth, r.descendant_count))
            .collect()
    }

    #[test]
    fn test_empty_forest() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_worked_example() {
        // A[B, C[D]]
        let forest = vec![node(1, vec![node(2, vec![]), node(3, vec![node(4, vec![])])])];
        assert_eq!(
            shape(&flatten(&forest)),
            vec![(1, 0, 3), (2, 1, 0), (3, 1, 1), (4, 2, 0)]
        );
    }

    #[test]
    fn test_siblings_do_not_interleave() {
        let forest = vec![
            node(1, vec![node(2, vec![node(3, vec![])])]),
            node(4, vec![]),
            node(5, vec![node(6, vec![])]),
        ];
        assert_eq!(
            shape(&flatten(&forest)),
            vec![(1, 0, 2), (2, 1, 1), (3, 2, 0), (4, 0, 0), (5, 0, 1), (6, 1, 0)]
        );
    }

    #[test]
    fn test_absent_fields_pass_through() {
        let mut deleted = CommentNode::new(9, at());
        deleted.author = None;
        deleted.body_html = None;

        let rows = flatten(&[deleted]);
        assert_eq!(rows[0].comment.author, None);
        assert_eq!(rows[0].comment.body_html, None);
    }

    #[test]
    fn test_fields_copied_without_children() {
        let mut n = node(7, vec![node(8, vec![])]);
        n.author = Some("pg".to_string());
        n.body_html = Some("<p>hello".to_string());

        let rows = flatten(&[n]);
        assert_eq!(
            rows[0].comment,
            CommentData {
                id: 7,
                author: Some("pg".to_string()),
                body_html: Some("<p>hello".to_string()),
                created_at: at(),
            }
        );
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let forest = vec![node(1, vec![node(2, vec![])]), node(3, vec![])];
        assert_eq!(flatten(&forest), flatten(&forest));
    }

    #[test]
    fn test_deep_chain() {
        let mut chain = node(100, vec![]);
        for id in (0..100).rev() {
            chain = node(id, vec![chain]);
        }
        let rows = flatten(&[chain]);
        assert_eq!(rows.len(), 101);
        assert_eq!(rows[0].descendant_count, 100);
        assert_eq!(rows[100].depth, 100);
    }
}
