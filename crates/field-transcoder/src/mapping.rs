use std::{
    collections::{hash_map::Entry, HashMap},
    sync::OnceLock,
};

use serde_json::{Map, Value};

use crate::{Convention, TranscodeError};

/// Field name table for one kind of upstream entity.
///
/// Explicit entries win; every other key goes through the generic camelCase/snake_case
/// conversion. The same table applies at every nesting depth of a record.
///
/// A snake_case word is lowercase ASCII letters and digits, starting with a letter. The camelCase
/// form uppercases the first letter of every word but the first, so `sha256_hash` becomes
/// `sha256Hash` and `a_b_c` becomes `aBC`. Keys outside these shapes, or whose generic form
/// collides with an explicit entry, are ambiguous. Both directions are exact inverses, so
/// `to_upstream(to_external(r)) == r` whenever both calls succeed.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    version: u32,
    to_upstream: HashMap<String, String>,
    to_external: HashMap<String, String>,
}

impl FieldMapping {
    /// Builds a table from `(external, upstream)` pairs.
    pub fn new<'a>(
        version: u32,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, TranscodeError> {
        let mut mapping = FieldMapping {
            version,
            ..Default::default()
        };

        for (external, upstream) in pairs {
            match mapping.to_upstream.entry(external.to_string()) {
                Entry::Occupied(_) => return Err(TranscodeError::DuplicateMapping(external.to_string())),
                Entry::Vacant(entry) => entry.insert(upstream.to_string()),
            };

            match mapping.to_external.entry(upstream.to_string()) {
                Entry::Occupied(_) => return Err(TranscodeError::DuplicateMapping(upstream.to_string())),
                Entry::Vacant(entry) => entry.insert(external.to_string()),
            };
        }

        Ok(mapping)
    }

    /// A table without explicit entries, shared by everything that has no table of its own.
    pub fn generic() -> &'static FieldMapping {
        static GENERIC: OnceLock<FieldMapping> = OnceLock::new();
        GENERIC.get_or_init(FieldMapping::default)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn to_external(&self, value: Value) -> Result<Value, TranscodeError> {
        transcode(value, &|key| self.external_key(key))
    }

    pub fn to_upstream(&self, value: Value) -> Result<Value, TranscodeError> {
        transcode(value, &|key| self.upstream_key(key))
    }

    fn external_key(&self, key: &str) -> Result<String, TranscodeError> {
        if let Some(external) = self.to_external.get(key) {
            return Ok(external.clone());
        }

        match camel_from_snake(key) {
            Some(candidate) if !self.to_upstream.contains_key(&candidate) => Ok(candidate),
            _ => Err(TranscodeError::Ambiguous {
                key: key.to_string(),
                target: Convention::External,
            }),
        }
    }

    fn upstream_key(&self, key: &str) -> Result<String, TranscodeError> {
        if let Some(upstream) = self.to_upstream.get(key) {
            return Ok(upstream.clone());
        }

        match snake_from_camel(key) {
            Some(candidate) if !self.to_external.contains_key(&candidate) => Ok(candidate),
            _ => Err(TranscodeError::Ambiguous {
                key: key.to_string(),
                target: Convention::Upstream,
            }),
        }
    }
}

/// `group_id` to `groupId`. Digits stay inside their word.
fn camel_from_snake(key: &str) -> Option<String> {
    let mut camel = String::with_capacity(key.len());

    for (index, word) in key.split('_').enumerate() {
        let mut chars = word.chars();

        // an empty word comes from a leading, trailing or doubled underscore
        let head = chars.next().filter(char::is_ascii_lowercase)?;

        if !chars.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return None;
        }

        camel.push(if index == 0 { head } else { head.to_ascii_uppercase() });
        camel.push_str(chars.as_str());
    }

    Some(camel)
}

/// `groupId` to `group_id`. Every uppercase letter starts a new word.
fn snake_from_camel(key: &str) -> Option<String> {
    if !key.starts_with(|c: char| c.is_ascii_lowercase()) {
        return None;
    }

    let mut snake = String::with_capacity(key.len() + 4);

    for c in key.chars() {
        if c.is_ascii_uppercase() {
            snake.push('_');
            snake.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            snake.push(c);
        } else {
            return None;
        }
    }

    Some(snake)
}

fn transcode(value: Value, convert: &impl Fn(&str) -> Result<String, TranscodeError>) -> Result<Value, TranscodeError> {
    match value {
        Value::Object(fields) => fields
            .into_iter()
            .map(|(key, value)| Ok((convert(&key)?, transcode(value, convert)?)))
            .collect::<Result<Map<_, _>, TranscodeError>>()
            .map(Value::Object),
        Value::Array(items) => items
            .into_iter()
            .map(|item| transcode(item, convert))
            .collect::<Result<Vec<_>, TranscodeError>>()
            .map(Value::Array),
        scalar => Ok(scalar),
    }
}
