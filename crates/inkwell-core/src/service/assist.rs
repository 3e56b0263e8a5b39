//! Tag and summary suggestions from a language model.

use std::sync::Arc;

use crate::DomainResult;
use crate::domain::BlogContent;
use crate::error::DomainError;
use crate::ports::{CompletionError, CompletionService};

pub const MAX_GENERATED_TAGS: usize = 4;
pub const SUMMARY_MIN_CHARS: usize = 150;
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Longest post text sent upstream for summarizing.
const MAX_SOURCE_CHARS: usize = 8_000;

const SYSTEM_PROMPT: &str = "You help writers on a blogging platform. Answer with the requested text only.";

pub struct AssistService {
    completion: Arc<dyn CompletionService>,
}

impl AssistService {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Suggest up to four lowercase tags for a post description.
    pub async fn generate_tags(&self, description: &str) -> DomainResult<Vec<String>> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("description is required"));
        }

        let prompt = format!(
            "Suggest at most {MAX_GENERATED_TAGS} short topic tags for a blog post with this \
             description. Reply with the tags separated by commas.\n\nDescription: {description}"
        );
        let raw = self.completion.complete(SYSTEM_PROMPT, &prompt).await?;

        let tags = parse_tags(&raw);
        if tags.is_empty() {
            return Err(CompletionError::Malformed("no tags in response".into()).into());
        }
        Ok(tags)
    }

    /// Summarize a post in at most 200 characters.
    pub async fn generate_summary(&self, title: &str, content: &BlogContent) -> DomainResult<String> {
        let text = format!("{} {}", title.trim(), content.plain_text());
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("content is required"));
        }
        let text: String = text.chars().take(MAX_SOURCE_CHARS).collect();

        let prompt = format!(
            "Summarize the following blog post in {SUMMARY_MIN_CHARS} to {SUMMARY_MAX_CHARS} \
             characters.\n\n{text}"
        );
        let raw = self.completion.complete(SYSTEM_PROMPT, &prompt).await?;

        let summary = trim_summary(&raw, SUMMARY_MAX_CHARS);
        if summary.is_empty() {
            return Err(CompletionError::Malformed("empty summary".into()).into());
        }
        Ok(summary)
    }
}

/// Split a model reply into clean tags: commas or newlines separate tags,
/// list markers, `#` and quotes are dropped, duplicates removed.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for piece in raw.split([',', '\n']) {
        let tag = strip_list_marker(piece.trim())
            .trim_matches(|c: char| matches!(c, '#' | '"' | '\'' | '`' | '.'))
            .trim()
            .to_lowercase();

        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == MAX_GENERATED_TAGS {
            break;
        }
    }
    tags
}

/// Drop a leading `-`, `*` or `1.` / `1)` list marker.
fn strip_list_marker(s: &str) -> &str {
    let s = s.trim_start_matches(['-', '*']).trim_start();
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    s
}

/// Collapse whitespace, drop surrounding quotes and cut to `max` characters
/// on a word boundary when possible.
pub fn trim_summary(raw: &str, max: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = collapsed.trim_matches(|c: char| c == '"' || c == '\'').trim();

    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    cut.trim_end_matches([',', ';', ':', ' ']).to_string()
}
