//! Data Transfer Objects - request types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /posts` and `PUT /posts/{id}`.
///
/// Every field is optional at the wire level; required-ness is checked by the
/// store so that a missing field yields a validation message, not a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}
