//! Structured post content as produced by the block editor.
//!
//! The wire shape follows editor.js output:
//! `{"time": .., "blocks": [{"id": .., "type": "paragraph", "data": {..}}], "version": ..}`.

use serde::{Deserialize, Serialize};

/// An ordered list of typed blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph {
        text: String,
    },
    Header {
        text: String,
        #[serde(default = "default_header_level")]
        level: u8,
    },
    List {
        #[serde(default)]
        style: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
    Quote {
        text: String,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        alignment: String,
    },
    Embed {
        service: String,
        source: String,
        embed: String,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
        #[serde(default)]
        caption: String,
    },
    Image {
        file: ImageFile,
        #[serde(default)]
        caption: String,
        #[serde(default, rename = "withBorder")]
        with_border: bool,
        #[serde(default)]
        stretched: bool,
        #[serde(default, rename = "withBackground")]
        with_background: bool,
    },
}

fn default_header_level() -> u8 {
    2
}

/// List items are plain strings in flat lists and objects in nested lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Nested {
        content: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub url: String,
}

impl BlogContent {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Readable text of the post: paragraphs, headers, quotes and list items
    /// with inline markup and entities stripped, joined by single spaces.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        for block in &self.blocks {
            match &block.kind {
                BlockKind::Paragraph { text }
                | BlockKind::Header { text, .. }
                | BlockKind::Quote { text, .. } => parts.push(strip_markup(text)),
                BlockKind::List { items, .. } => collect_list_text(items, &mut parts),
                BlockKind::Embed { .. } | BlockKind::Image { .. } => {}
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

fn collect_list_text(items: &[ListItem], out: &mut Vec<String>) {
    for item in items {
        match item {
            ListItem::Text(text) => out.push(strip_markup(text)),
            ListItem::Nested { content, items } => {
                out.push(strip_markup(content));
                collect_list_text(items, out);
            }
        }
    }
}

/// Remove HTML tags and the handful of entities the editor emits.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    let out = out
        .replace("&nbsp;", " ")
        .replace("&nbsp", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
