use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Base URL of the public discussion pages, used for "open on HN".
pub const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

// ============================================================================
// Domain types
// ============================================================================

/// One entry of the ranked front page.
///
/// Field aliases accept the camelCase snapshot format used by offline fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "user")]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default, alias = "numberOfComments")]
    pub comment_count: u64,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    /// HTML body of self posts (Ask HN, Show HN without a link).
    #[serde(default)]
    pub text: Option<String>,
}

impl StorySummary {
    /// Discussion page for this story.
    pub fn discussion_url(&self) -> String {
        format!("{}{}", HN_ITEM_URL, self.id)
    }

    /// Link target: the submitted URL, or the discussion page for self posts.
    pub fn link(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.discussion_url(),
        }
    }

    /// Host of the submitted URL without a leading `www.`.
    pub fn domain(&self) -> Option<String> {
        let parsed = url::Url::parse(self.url.as_deref()?).ok()?;
        let host = parsed.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }
}

/// A story with its full comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(flatten)]
    pub summary: StorySummary,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<CommentNode>,
}

/// A comment and its replies, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: u64,
    /// `None` for deleted comments.
    #[serde(default, alias = "user")]
    pub author: Option<String>,
    #[serde(default, alias = "text")]
    pub body_html: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "comments", deserialize_with = "null_as_empty")]
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// A comment with no author, body or replies.
    pub fn new(id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author: None,
            body_html: None,
            created_at,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<CommentNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_size).sum::<usize>()
    }
}

/// `null` and a missing field both mean "no children".
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ItemKind {
    Job,
    Story,
    Comment,
    Poll,
    Pollopt,
}

/// Raw `/v0/item/<id>.json` payload. Every field except `id` may be absent.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Item {
    pub id: u64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub by: Option<String>,
    #[serde(default)]
    pub time: i64,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kids: Vec<u64>,
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    pub title: Option<String>,
    #[serde(default)]
    pub descendants: u64,
}

fn unix_time_to_date(time: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(time, 0).unwrap_or_default()
}

impl Item {
    /// Front page entries are stories, jobs and polls that still exist.
    pub fn into_summary(self) -> Option<StorySummary> {
        if self.deleted || self.dead {
            return None;
        }
        if !matches!(
            self.kind,
            Some(ItemKind::Story | ItemKind::Job | ItemKind::Poll)
        ) {
            return None;
        }
        Some(StorySummary {
            id: self.id,
            title: self.title.unwrap_or_default(),
            author: self.by,
            score: self.score,
            comment_count: self.descendants,
            created_at: unix_time_to_date(self.time),
            url: self.url,
            text: self.text,
        })
    }

    /// Deleted and dead comments lose author and body but keep their place.
    pub fn into_comment(self, children: Vec<CommentNode>) -> CommentNode {
        let removed = self.deleted || self.dead;
        CommentNode {
            id: self.id,
            author: if removed { None } else { self.by },
            body_html: if removed { None } else { self.text },
            created_at: unix_time_to_date(self.time),
            children,
        }
    }

    /// A removed comment with no replies carries nothing worth showing.
    pub fn is_prunable(&self) -> bool {
        (self.deleted || self.dead) && self.kids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_item_story_into_summary() {
        let item: Item = serde_json::from_str(
            r#"{"id":8863,"type":"story","by":"dhouston","time":1175714200,
                "title":"My YC app: Dropbox","url":"http://www.getdropbox.com/u/2/screencast.html",
                "score":111,"descendants":71,"kids":[9224,8917]}"#,
        )
        .unwrap();
        let summary = item.into_summary().unwrap();
        assert_eq!(summary.id, 8863);
        assert_eq!(summary.author.as_deref(), Some("dhouston"));
        assert_eq!(summary.comment_count, 71);
        assert_eq!(summary.created_at.timestamp(), 1175714200);
        assert_eq!(summary.domain().as_deref(), Some("getdropbox.com"));
    }

    #[test]
    fn test_comment_item_is_not_a_summary() {
        let item: Item =
            serde_json::from_str(r#"{"id":1,"type":"comment","by":"a","time":0}"#).unwrap();
        assert!(item.into_summary().is_none());
    }

    #[test]
    fn test_deleted_story_is_skipped() {
        let item: Item =
            serde_json::from_str(r#"{"id":1,"type":"story","deleted":true,"time":0}"#).unwrap();
        assert!(item.into_summary().is_none());
    }

    #[test]
    fn test_null_kids_is_empty() {
        let item: Item = serde_json::from_str(r#"{"id":1,"kids":null}"#).unwrap();
        assert!(item.kids.is_empty());
    }

    #[test]
    fn test_removed_comment_loses_author_and_text() {
        let item: Item = serde_json::from_str(
            r#"{"id":2,"type":"comment","by":"x","text":"gone","dead":true,"time":5,"kids":[3]}"#,
        )
        .unwrap();
        assert!(!item.is_prunable());
        let node = item.into_comment(vec![]);
        assert_eq!(node.author, None);
        assert_eq!(node.body_html, None);
    }

    #[test]
    fn test_removed_leaf_is_prunable() {
        let item: Item =
            serde_json::from_str(r#"{"id":2,"type":"comment","deleted":true}"#).unwrap();
        assert!(item.is_prunable());
    }

    #[test]
    fn test_snapshot_format_with_null_children() {
        let story: Story = serde_json::from_str(
            r#"{"id":7,"title":"T","user":"u","score":3,"numberOfComments":1,
                "createdAt":"2022-11-24T10:00:00Z","url":"https://example.com",
                "comments":[{"id":8,"user":"c","text":"<p>hi","createdAt":"2022-11-24T10:05:00Z","comments":null}]}"#,
        )
        .unwrap();
        assert_eq!(story.summary.author.as_deref(), Some("u"));
        assert_eq!(story.comments.len(), 1);
        assert!(story.comments[0].children.is_empty());
        assert_eq!(story.comments[0].body_html.as_deref(), Some("<p>hi"));
    }

    #[test]
    fn test_link_falls_back_to_discussion() {
        let item: Item =
            serde_json::from_str(r#"{"id":121003,"type":"story","title":"Ask HN","time":0}"#)
                .unwrap();
        let summary = item.into_summary().unwrap();
        assert_eq!(
            summary.link(),
            "https://news.ycombinator.com/item?id=121003"
        );
        assert_eq!(summary.domain(), None);
    }

    #[test]
    fn test_subtree_size() {
        let at = unix_time_to_date(0);
        let tree = CommentNode::new(1, at).with_children(vec![
            CommentNode::new(2, at),
            CommentNode::new(3, at).with_children(vec![CommentNode::new(4, at)]),
        ]);
        assert_eq!(tree.subtree_size(), 4);
    }
}
