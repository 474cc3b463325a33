//! Discord execute-webhook message types.
//!
//! Only the subset of the Discord webhook body the relay sends is modelled.

use serde::{Deserialize, Serialize};

/// Body of a `POST` to a Discord incoming webhook URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordMessage {
    pub content: String,
    pub allowed_mentions: AllowedMentions,
    pub username: String,
    pub embeds: Vec<Embed>,
}

/// Which mention kinds in `content` Discord should resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    /// Side-bar colour as a 24-bit RGB integer.
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// ISO-8601 timestamp shown in the embed footer.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}
