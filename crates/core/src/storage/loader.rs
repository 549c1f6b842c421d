//! JSON loaders for the corpus, the synonym table, the lemma dictionary and
//! query lists.
//!
//! Whole-file problems (unreadable, not JSON, wrong top-level shape) fail
//! fast. Problems confined to one record are logged and the record skipped.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::expansion::synonyms::{SimilarTerm, SynonymTable};
use crate::storage::corpus::Corpus;
use crate::text::lemma::{LemmaCandidate, LemmaDictionary};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract a document id from `_id` (string or `{"$oid": string}`) or `id`.
fn record_id(record: &Map<String, Value>) -> Option<String> {
    let raw = record.get("_id").or_else(|| record.get("id"))?;
    let id = match raw {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("$oid")?.as_str()?,
        _ => return None,
    };
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(record: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    record.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn record_to_document(index: usize, record: &Value) -> Option<Document> {
    let Some(obj) = record.as_object() else {
        tracing::warn!(index, "skipping corpus record that is not an object");
        return None;
    };
    let Some(id) = record_id(obj) else {
        tracing::warn!(index, "skipping corpus record with missing or unparseable id");
        return None;
    };
    Some(Document {
        id,
        title: string_field(obj, "title").unwrap_or_default(),
        abstract_text: string_field(obj, "abstract").unwrap_or_default(),
        tags: string_list(obj, "tags").unwrap_or_default(),
        categories: string_list(obj, "categories"),
        author: string_field(obj, "author"),
        date: string_field(obj, "date"),
    })
}

/// Build a corpus from a parsed JSON value (must be an array of records).
pub fn corpus_from_value(value: &Value) -> Result<Corpus> {
    let records = value.as_array().ok_or_else(|| {
        Error::InvalidCorpus("top-level JSON value must be an array of documents".into())
    })?;
    let documents: Vec<Document> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| record_to_document(i, r))
        .collect();
    let skipped = records.len() - documents.len();
    let corpus = Corpus::new(documents);
    if skipped > 0 {
        tracing::warn!(skipped, kept = corpus.len(), "corpus records skipped");
    }
    Ok(corpus)
}

/// Load a corpus file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let value = read_json(path)?;
    let corpus = corpus_from_value(&value).map_err(|e| match e {
        Error::InvalidCorpus(msg) => Error::InvalidCorpus(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    tracing::info!(path = %path.display(), documents = corpus.len(), "Loaded corpus");
    Ok(corpus)
}

/// Parse `[[term, score], ...]` pairs, skipping malformed ones.
fn weighted_pairs(key: &str, value: &Value) -> Vec<(String, f64)> {
    let Some(items) = value.as_array() else {
        tracing::warn!(key, "expected an array of [term, weight] pairs, ignoring entry");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let pair = item.as_array()?;
            match (pair.first().and_then(Value::as_str), pair.get(1).and_then(Value::as_f64)) {
                (Some(term), Some(weight)) if pair.len() == 2 => Some((term.to_string(), weight)),
                _ => {
                    tracing::warn!(key, item = %item, "skipping malformed [term, weight] pair");
                    None
                }
            }
        })
        .collect()
}

/// Build a synonym table from a parsed JSON object, in key order.
pub fn synonyms_from_value(value: &Value, top_n: usize) -> Result<SynonymTable> {
    let obj = value.as_object().ok_or_else(|| {
        Error::InvalidConfig("synonym table must be a JSON object of term -> pairs".into())
    })?;
    let entries = obj.iter().map(|(key, v)| {
        let similar = weighted_pairs(key, v)
            .into_iter()
            .map(|(term, weight)| SimilarTerm::new(term, weight))
            .collect();
        (key.clone(), similar)
    });
    Ok(SynonymTable::from_entries(entries, top_n))
}

/// Load a synonym table file. A table is optional input: see [`load_synonyms_or_empty`].
pub fn load_synonyms(path: &Path, top_n: usize) -> Result<SynonymTable> {
    let value = read_json(path)?;
    let table = synonyms_from_value(&value, top_n)?;
    tracing::info!(path = %path.display(), terms = table.len(), "Loaded synonym table");
    Ok(table)
}

/// Load a synonym table if a path is given; otherwise expansion is the identity.
pub fn load_synonyms_or_empty(path: Option<&Path>, top_n: usize) -> Result<SynonymTable> {
    match path {
        Some(p) => load_synonyms(p, top_n),
        None => {
            tracing::info!("No synonym table given, expansion disabled");
            Ok(SynonymTable::empty())
        }
    }
}

/// Build a lemma dictionary from a parsed JSON object.
pub fn lemmas_from_value(value: &Value) -> Result<LemmaDictionary> {
    let obj = value.as_object().ok_or_else(|| {
        Error::InvalidConfig("lemma dictionary must be a JSON object of word -> pairs".into())
    })?;
    Ok(LemmaDictionary::from_entries(obj.iter().map(|(word, v)| {
        let candidates = weighted_pairs(word, v)
            .into_iter()
            .map(|(lemma, score)| LemmaCandidate::new(lemma, score))
            .collect();
        (word.clone(), candidates)
    })))
}

/// Load a lemma dictionary file.
pub fn load_lemma_dictionary(path: &Path) -> Result<LemmaDictionary> {
    let value = read_json(path)?;
    let dict = lemmas_from_value(&value)?;
    tracing::info!(path = %path.display(), words = dict.len(), "Loaded lemma dictionary");
    Ok(dict)
}

/// Load queries from a JSON array of strings, or one query per line otherwise.
///
/// Blank lines and blank strings are ignored.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let trimmed = raw.trim_start();
    let queries: Vec<String> = if trimmed.starts_with('[') {
        let parsed: Vec<String> =
            serde_json::from_str(trimmed).map_err(|source| Error::ParseFile {
                path: path.to_path_buf(),
                source,
            })?;
        parsed
    } else {
        raw.lines().map(str::to_string).collect()
    };
    Ok(queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect())
}
