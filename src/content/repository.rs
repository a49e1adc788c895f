use std::sync::Arc;

use tracing::{info, warn};

use crate::content::store::ContentStore;
use crate::content::{ContentKind, ContentLists};
use crate::error::ContentError;

const DEFAULT_TEXTS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog. This sentence contains every letter of the alphabet at least once.",
    "Programming is not just about writing code; it's about solving problems and creating solutions that make life easier.",
    "In the world of web development, HTML provides structure, CSS adds style, and JavaScript brings interactivity to life.",
];

const DEFAULT_SNIPPETS: &[&str] = &[
    r#"<div class="container"><h1>Hello World</h1><p>Welcome to HTML!</p></div>"#,
    r##"<nav class="navbar"><ul><li><a href="#home">Home</a></li><li><a href="#about">About</a></li></ul></nav>"##,
    r#"<form action="/submit" method="post"><input type="text" name="username" required><button type="submit">Submit</button></form>"#,
];

/// Built-in list used when the remote copy can't be read.
pub fn default_list(kind: ContentKind) -> Vec<String> {
    let src = match kind {
        ContentKind::TypingTexts => DEFAULT_TEXTS,
        ContentKind::HtmlSnippets => DEFAULT_SNIPPETS,
    };
    src.iter().map(|s| s.to_string()).collect()
}

pub fn default_lists() -> ContentLists {
    ContentLists {
        texts: default_list(ContentKind::TypingTexts),
        snippets: default_list(ContentKind::HtmlSnippets),
    }
}

/// Trim every entry and drop the blank ones.
pub fn clean_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Editor text to list: one entry per line, blanks dropped.
pub fn split_editor_text(text: &str) -> Vec<String> {
    clean_lines(&text.lines().collect::<Vec<_>>())
}

/// Loads and saves the editable lists through a [`ContentStore`], falling
/// back to built-in defaults per list when a read fails.
#[derive(Clone)]
pub struct ContentRepository {
    store: Arc<dyn ContentStore>,
}

impl ContentRepository {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> ContentLists {
        let lists = ContentLists {
            texts: self.fetch_or_default(ContentKind::TypingTexts),
            snippets: self.fetch_or_default(ContentKind::HtmlSnippets),
        };
        info!(
            texts = lists.texts.len(),
            snippets = lists.snippets.len(),
            "content loaded"
        );
        lists
    }

    /// Replace the remote list. Returns the cleaned list that was stored.
    pub fn save<S: AsRef<str>>(
        &self,
        kind: ContentKind,
        lines: &[S],
    ) -> Result<Vec<String>, ContentError> {
        let cleaned = clean_lines(lines);
        match self.store.replace(kind, &cleaned) {
            Ok(()) => {
                info!(kind = kind.endpoint(), entries = cleaned.len(), "content saved");
                Ok(cleaned)
            }
            Err(e) => {
                warn!(kind = kind.endpoint(), error = %e, "content save failed");
                Err(e)
            }
        }
    }

    fn fetch_or_default(&self, kind: ContentKind) -> Vec<String> {
        match self.store.fetch(kind) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(kind = kind.endpoint(), error = %e, "using built-in defaults");
                default_list(kind)
            }
        }
    }
}
