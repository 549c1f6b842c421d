//! Document fields and field-sets.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A matchable document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Document tags.
    Tags,
    /// Document title.
    Title,
    /// Document abstract.
    Abstract,
}

impl Field {
    /// All fields, in the order used for reporting.
    pub const ALL: [Field; 3] = [Field::Tags, Field::Title, Field::Abstract];

    /// Field name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Tags => "tags",
            Field::Title => "title",
            Field::Abstract => "abstract",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tags" => Ok(Field::Tags),
            "title" => Ok(Field::Title),
            "abstract" => Ok(Field::Abstract),
            _ => Err(Error::InvalidField(s.to_string())),
        }
    }
}

/// A non-empty set of fields considered during one retrieval run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldSet(Vec<Field>);

impl FieldSet {
    /// Builds a set from `fields`, dropping duplicates. Fails when empty.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        let mut v: Vec<Field> = fields.into_iter().collect();
        v.sort();
        v.dedup();
        if v.is_empty() {
            return Err(Error::EmptyFieldSet);
        }
        Ok(Self(v))
    }

    /// Title, abstract and tags.
    pub fn all() -> Self {
        Self(Field::ALL.to_vec())
    }

    /// Returns `true` if `field` is part of the set.
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    /// Iterates the fields in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for FieldSet {
    type Err = Error;

    /// Parses a comma-separated list such as `tags,title`.
    fn from_str(s: &str) -> Result<Self> {
        let fields = s
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Field>>>()?;
        Self::new(fields)
    }
}

impl TryFrom<Vec<Field>> for FieldSet {
    type Error = Error;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<FieldSet> for Vec<Field> {
    fn from(set: FieldSet) -> Self {
        set.0
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Field::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_set() {
        let set: FieldSet = "title, Tags,title".parse().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Tags, Field::Title]);
        assert_eq!(set.to_string(), "tags,title");
        assert!(!set.contains(Field::Abstract));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<FieldSet>(), Err(Error::EmptyFieldSet)));
        assert!(matches!(
            "tags,body".parse::<FieldSet>(),
            Err(Error::InvalidField(ref f)) if f == "body"
        ));
    }

    #[test]
    fn test_serde_round_trip_rejects_empty() {
        let set: FieldSet = serde_json::from_str(r#"["abstract","tags"]"#).unwrap();
        assert_eq!(set.to_string(), "tags,abstract");
        assert!(serde_json::from_str::<FieldSet>("[]").is_err());
    }
}
