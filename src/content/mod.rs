pub mod repository;
pub mod store;

use crate::error::ContentError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    TypingTexts,
    HtmlSnippets,
}

impl ContentKind {
    /// Path segment under `/api/`.
    pub fn endpoint(self) -> &'static str {
        match self {
            ContentKind::TypingTexts => "typing-texts",
            ContentKind::HtmlSnippets => "html-snippets",
        }
    }

    /// JSON field holding the list in both directions.
    pub fn field(self) -> &'static str {
        match self {
            ContentKind::TypingTexts => "texts",
            ContentKind::HtmlSnippets => "snippets",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::TypingTexts => "typing texts",
            ContentKind::HtmlSnippets => "HTML snippets",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentLists {
    pub texts: Vec<String>,
    pub snippets: Vec<String>,
}

impl ContentLists {
    pub fn get(&self, kind: ContentKind) -> &[String] {
        match kind {
            ContentKind::TypingTexts => &self.texts,
            ContentKind::HtmlSnippets => &self.snippets,
        }
    }

    pub fn set(&mut self, kind: ContentKind, lines: Vec<String>) {
        match kind {
            ContentKind::TypingTexts => self.texts = lines,
            ContentKind::HtmlSnippets => self.snippets = lines,
        }
    }
}

/// Work handed to a background thread; the network is the only blocking
/// boundary in the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentRequest {
    Load,
    Save {
        kind: ContentKind,
        lines: Vec<String>,
        /// Editor generation the save was issued under.
        generation: u64,
        /// Issue order across all saves; later saves supersede earlier ones.
        seq: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentResponse {
    Loaded(ContentLists),
    Saved {
        kind: ContentKind,
        generation: u64,
        seq: u64,
        result: Result<Vec<String>, ContentError>,
    },
}

impl ContentRequest {
    pub fn execute(self, repo: &repository::ContentRepository) -> ContentResponse {
        match self {
            ContentRequest::Load => ContentResponse::Loaded(repo.load()),
            ContentRequest::Save {
                kind,
                lines,
                generation,
                seq,
            } => ContentResponse::Saved {
                kind,
                generation,
                seq,
                result: repo.save(kind, &lines),
            },
        }
    }
}
