//! Core document types.
//!
//! A [`Document`] is one scholarly record (title, abstract, tags). It is
//! created by the corpus loader and never mutated afterwards. [`FoldedFields`]
//! holds the lowercase copies every field matcher works against, computed
//! once per document instead of once per query.

use serde::{Deserialize, Serialize};

/// A loaded corpus record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier, unique within the corpus.
    #[serde(rename = "_id")]
    pub id: String,
    /// Title text.
    #[serde(default)]
    pub title: String,
    /// Abstract text.
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    /// Free-form tags, in source order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional subject categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Optional author line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional publication date, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Document {
    /// Creates a document with the three matched fields and no extra metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            tags,
            categories: None,
            author: None,
            date: None,
        }
    }

    /// Lowercase view of the matched fields.
    pub fn fold(&self) -> FoldedFields {
        FoldedFields::new(self)
    }

    /// Concatenation used by the statistical retriever: title, abstract, tags.
    pub fn full_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len()
                + self.abstract_text.len()
                + self.tags.iter().map(|t| t.len() + 1).sum::<usize>()
                + 2,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.abstract_text);
        text.push(' ');
        text.push_str(&self.tags.join(" "));
        text
    }
}

/// Case-folded copies of a document's title, abstract and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedFields {
    /// Lowercased title.
    pub title: String,
    /// Lowercased title with one space on each side, for word-boundary checks.
    pub padded_title: String,
    /// Lowercased abstract.
    pub abstract_text: String,
    /// Lowercased tags.
    pub tags: Vec<String>,
}

impl FoldedFields {
    /// Folds the matched fields of `doc`.
    pub fn new(doc: &Document) -> Self {
        let title = doc.title.to_lowercase();
        let padded_title = format!(" {title} ");
        Self {
            title,
            padded_title,
            abstract_text: doc.abstract_text.to_lowercase(),
            tags: doc.tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}
