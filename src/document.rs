//! Document data exchanged with the document store and carried in events
//!
//! The editor never inspects these beyond passing them through to the host.

use serde::{Deserialize, Serialize};

/// Rich-text formatting flags on a run of characters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single document character with its stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocChar {
    pub id: String,
    pub value: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

/// Run of text sharing the same attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichChunk {
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Cursor location: the character the cursor sits after, and whether it is
/// rendered at the end of the previous line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub char_id: String,
    #[serde(default)]
    pub eol: bool,
}

/// Cursor of another collaborating user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCursor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Text inserted into or deleted from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub chars: Vec<DocChar>,
    /// Whether the change originated locally (as opposed to a remote peer)
    pub local: bool,
}
