//! Property tests for the comment flattener and collapse projector.
//!
//! Forests are generated at random; every property is checked against a
//! straightforward reference computed from the tree or from the rows.

use chrono::{DateTime, TimeZone, Utc};
use hnr::hn::CommentNode;
use hnr::thread::{flatten, project, CommentThread, FlatCommentRow};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

fn node(id: u64, children: Vec<CommentNode>) -> CommentNode {
    CommentNode::new(id, at()).with_children(children)
}

fn arb_tree() -> impl Strategy<Value = CommentNode> {
    let leaf = (0u64..10_000, proptest::option::of("[a-z]{1,8}")).prop_map(|(id, author)| {
        let mut n = node(id, Vec::new());
        n.author = author;
        n
    });
    leaf.prop_recursive(6, 64, 5, |inner| {
        (0u64..10_000, proptest::collection::vec(inner, 0..5))
            .prop_map(|(id, children)| node(id, children))
    })
}

fn arb_forest() -> impl Strategy<Value = Vec<CommentNode>> {
    proptest::collection::vec(arb_tree(), 0..6)
}

fn arb_forest_with_flags() -> impl Strategy<Value = (Vec<CommentNode>, Vec<bool>)> {
    arb_forest().prop_flat_map(|forest| {
        let n: usize = forest.iter().map(CommentNode::subtree_size).sum();
        (Just(forest), proptest::collection::vec(any::<bool>(), n))
    })
}

/// (id, depth) in pre-order, computed directly from the tree.
fn preorder(nodes: &[CommentNode], depth: usize, out: &mut Vec<(u64, usize)>) {
    for n in nodes {
        out.push((n.id, depth));
        preorder(&n.children, depth + 1, out);
    }
}

/// Parent row of every row, from depths alone.
fn parents(rows: &[FlatCommentRow]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            while stack.last().is_some_and(|&top| rows[top].depth >= row.depth) {
                stack.pop();
            }
            let parent = stack.last().copied();
            stack.push(i);
            parent
        })
        .collect()
}

proptest! {
    #[test]
    fn flatten_emits_every_node_once(forest in arb_forest()) {
        let rows = flatten(&forest);
        let expected: usize = forest.iter().map(CommentNode::subtree_size).sum();
        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn flatten_is_preorder(forest in arb_forest()) {
        let rows = flatten(&forest);
        let mut expected = Vec::new();
        preorder(&forest, 0, &mut expected);
        let actual: Vec<(u64, usize)> = rows.iter().map(|r| (r.comment.id, r.depth)).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn descendant_count_spans_the_subtree(forest in arb_forest()) {
        let rows = flatten(&forest);
        for (i, row) in rows.iter().enumerate() {
            let span = rows[i + 1..]
                .iter()
                .take_while(|r| r.depth > row.depth)
                .count();
            prop_assert_eq!(row.descendant_count, span, "row {}", i);
        }
    }

    #[test]
    fn flatten_is_deterministic(forest in arb_forest()) {
        prop_assert_eq!(flatten(&forest), flatten(&forest));
    }

    #[test]
    fn projection_preserves_length_and_flags((forest, flags) in arb_forest_with_flags()) {
        let rows = flatten(&forest);
        let visible = project(&rows, &flags);
        prop_assert_eq!(visible.len(), rows.len());
        for (i, v) in visible.iter().enumerate() {
            prop_assert_eq!(v.collapsed, flags[i]);
            prop_assert!(std::ptr::eq(v.row, &rows[i]));
        }
    }

    #[test]
    fn hidden_iff_some_ancestor_collapsed((forest, flags) in arb_forest_with_flags()) {
        let rows = flatten(&forest);
        let parent = parents(&rows);
        let visible = project(&rows, &flags);

        for (i, v) in visible.iter().enumerate() {
            let mut ancestor = parent[i];
            let mut expected = false;
            while let Some(a) = ancestor {
                expected |= flags[a];
                ancestor = parent[a];
            }
            prop_assert_eq!(v.hidden, expected, "row {}", i);
        }
    }

    #[test]
    fn roots_are_never_hidden((forest, flags) in arb_forest_with_flags()) {
        let rows = flatten(&forest);
        for (row, v) in rows.iter().zip(project(&rows, &flags)) {
            if row.depth == 0 {
                prop_assert!(!v.hidden);
            }
        }
    }

    #[test]
    fn projection_is_idempotent((forest, flags) in arb_forest_with_flags()) {
        let rows = flatten(&forest);
        let first: Vec<(bool, bool)> =
            project(&rows, &flags).iter().map(|v| (v.collapsed, v.hidden)).collect();
        let second: Vec<(bool, bool)> =
            project(&rows, &flags).iter().map(|v| (v.collapsed, v.hidden)).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn all_expanded_hides_nothing(forest in arb_forest()) {
        let rows = flatten(&forest);
        let flags = vec![false; rows.len()];
        prop_assert!(project(&rows, &flags).iter().all(|v| !v.hidden && !v.collapsed));
    }

    #[test]
    fn toggling_twice_restores_visibility(
        (forest, flags) in arb_forest_with_flags(),
        pick in any::<proptest::sample::Index>(),
    ) {
        let mut thread = CommentThread::new(1, &forest);
        for (i, &flag) in flags.iter().enumerate() {
            if flag {
                thread.toggle(i);
            }
        }
        let before = thread.visible_indices().to_vec();
        if !thread.is_empty() {
            let row = pick.index(thread.len());
            thread.toggle(row);
            thread.toggle(row);
        }
        prop_assert_eq!(thread.visible_indices(), before.as_slice());
    }
}

#[test]
fn worked_example() {
    // A[B, C[D]]
    let forest = vec![node(
        1,
        vec![node(2, Vec::new()), node(3, vec![node(4, Vec::new())])],
    )];
    let rows = flatten(&forest);

    let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
    let descendants: Vec<usize> = rows.iter().map(|r| r.descendant_count).collect();
    assert_eq!(depths, vec![0, 1, 1, 2]);
    assert_eq!(descendants, vec![3, 0, 1, 0]);

    let hidden = |flags: &[bool]| -> Vec<bool> {
        project(&rows, flags).iter().map(|v| v.hidden).collect()
    };
    // Collapsing a leaf hides nothing.
    assert_eq!(hidden(&[false, true, false, false]), vec![false; 4]);
    // Collapsing C hides only D.
    assert_eq!(hidden(&[false, false, true, false]), vec![false, false, false, true]);
    // Collapsing A hides everything below it, whatever the inner flags say.
    assert_eq!(hidden(&[true, false, true, false]), vec![false, true, true, true]);
}

#[test]
fn scope_closes_at_sibling_depth() {
    // X[Y[Z]], W
    let forest = vec![
        node(1, vec![node(2, vec![node(3, Vec::new())])]),
        node(4, Vec::new()),
    ];
    let rows = flatten(&forest);
    let visible = project(&rows, &[false, true, false, false]);
    let hidden: Vec<bool> = visible.iter().map(|v| v.hidden).collect();
    assert_eq!(hidden, vec![false, false, true, false]);
}

#[test]
#[should_panic(expected = "collapse flags must align")]
fn mismatched_flags_panic() {
    let rows = flatten(&[node(1, Vec::new())]);
    project(&rows, &[]);
}
