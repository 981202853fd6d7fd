use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author recorded when a post is created without one.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Post entity - represents a single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post from validated fields.
    ///
    /// This is the only place an id and a creation time are assigned.
    pub fn create(changes: PostChanges) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: changes.title,
            content: changes.content,
            author: changes.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            created_at: Utc::now(),
        }
    }

    /// Overwrite the mutable fields. A missing author keeps the current one.
    pub fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        if let Some(author) = changes.author {
            self.author = author;
        }
    }
}

/// Client-submitted post fields, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

/// Validated values for the three mutable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    /// `None` when the client did not supply an author.
    pub author: Option<String>,
}

impl PostDraft {
    pub fn new(title: Option<String>, content: Option<String>, author: Option<String>) -> Self {
        Self {
            title,
            content,
            author,
        }
    }

    /// Check required fields, reporting every violation at once.
    pub fn validate(self) -> Result<PostChanges, DomainError> {
        let mut missing = Vec::new();
        let title = required(self.title, "title", &mut missing);
        let content = required(self.content, "content", &mut missing);

        match (title, content) {
            (Some(title), Some(content)) => Ok(PostChanges {
                title,
                content,
                author: self.author.filter(|a| !a.trim().is_empty()),
            }),
            _ => Err(DomainError::Validation(format!(
                "Post validation failed: {}",
                missing.join(", ")
            ))),
        }
    }
}

fn required(value: Option<String>, field: &str, missing: &mut Vec<String>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(format!("{field} is required"));
            None
        }
    }
}
