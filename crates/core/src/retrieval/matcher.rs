//! Per-field match policies.
//!
//! The three policies differ on purpose and must not be unified:
//! - **tags**: substring of any tag (so "ai" hits the tag "train"),
//! - **title**: whole-word occurrence, checked as `" term "` inside the
//!   space-padded title,
//! - **abstract**: plain substring, no word boundary.
//!
//! Terms are expected to be normalized already (lowercase); documents are
//! matched through their [`FoldedFields`].

use crate::document::FoldedFields;
use crate::retrieval::field::Field;

/// True if any term is a substring of any tag.
pub fn match_in_tags<S: AsRef<str>>(doc: &FoldedFields, terms: &[S]) -> bool {
    terms
        .iter()
        .any(|t| doc.tags.iter().any(|tag| tag.contains(t.as_ref())))
}

/// True if any term occurs as a space-delimited word sequence in the title.
pub fn match_in_title<S: AsRef<str>>(doc: &FoldedFields, terms: &[S]) -> bool {
    terms.iter().any(|t| {
        let needle = format!(" {} ", t.as_ref());
        doc.padded_title.contains(&needle)
    })
}

/// True if any term is a substring of the abstract.
pub fn match_in_abstract<S: AsRef<str>>(doc: &FoldedFields, terms: &[S]) -> bool {
    terms
        .iter()
        .any(|t| doc.abstract_text.contains(t.as_ref()))
}

/// Applies the policy of `field`.
pub fn matches<S: AsRef<str>>(doc: &FoldedFields, terms: &[S], field: Field) -> bool {
    match field {
        Field::Tags => match_in_tags(doc, terms),
        Field::Title => match_in_title(doc, terms),
        Field::Abstract => match_in_abstract(doc, terms),
    }
}
