//! Comment thread model: tree flattening and collapse projection.
//!
//! A story's comments arrive as a nested forest of [`CommentNode`]s. The
//! thread view works on a linear sequence instead:
//!
//! - [`flatten`] turns the forest into pre-order [`FlatCommentRow`]s, each
//!   annotated with its depth and the size of its subtree
//! - [`CollapseState`] holds one user-controlled "collapsed" flag per row
//! - [`project`] derives, for every row, whether it is hidden by a collapsed
//!   ancestor
//!
//! [`CommentThread`] bundles the three for the UI: rows are computed once per
//! fetch, flags evolve with key presses, and visibility is re-projected after
//! every toggle.
//!
//! [`CommentNode`]: crate::hn::CommentNode

mod collapse;
mod flatten;
mod view;

pub use collapse::{project, CollapseState, VisibleCommentRow};
pub use flatten::{flatten, CommentData, FlatCommentRow};
pub use view::CommentThread;
