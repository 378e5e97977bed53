use std::cmp::Ordering;

use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Stable sort, so records comparing equal keep their upstream order.
pub(crate) fn sort_records(records: &mut [Value], spec: &SortSpec) {
    records.sort_by(|a, b| {
        let a = SortKey::new(a.get(&spec.field));
        let b = SortKey::new(b.get(&spec.field));

        a.compare(&b, spec.direction)
    });
}

enum SortKey<'a> {
    Number(&'a Number),
    String(&'a str),
    Bool(bool),
    /// Missing, null, or nested values.
    Other,
}

impl<'a> SortKey<'a> {
    fn new(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Number(number)) => SortKey::Number(number),
            Some(Value::String(string)) => SortKey::String(string),
            Some(Value::Bool(boolean)) => SortKey::Bool(*boolean),
            _ => SortKey::Other,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::String(_) => 1,
            SortKey::Bool(_) => 2,
            SortKey::Other => 3,
        }
    }

    // The rank is never reversed: values of an unexpected kind stay at the end in both directions.
    fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        let ordering = match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => compare_numbers(a, b),
            (SortKey::String(a), SortKey::String(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => return self.rank().cmp(&other.rank()),
        };

        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }

    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }

    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);

    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sorted(records: Value, spec: SortSpec) -> Value {
        let Value::Array(mut records) = records else {
            unreachable!()
        };

        sort_records(&mut records, &spec);

        Value::Array(records)
    }

    #[test]
    fn numbers_sort_numerically() {
        let records = json!([{ "id": 10 }, { "id": 9 }, { "id": -1 }, { "id": 2.5 }]);

        assert_eq!(
            json!([{ "id": -1 }, { "id": 2.5 }, { "id": 9 }, { "id": 10 }]),
            sorted(records, SortSpec::ascending("id"))
        );
    }

    #[test]
    fn strings_sort_lexicographically() {
        let records = json!([{ "name": "b" }, { "name": "B" }, { "name": "a" }]);

        assert_eq!(
            json!([{ "name": "b" }, { "name": "a" }, { "name": "B" }]),
            sorted(records, SortSpec::descending("name"))
        );
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let records = json!([{ "id": 1 }, { "name": "x" }, { "id": null }, { "id": 2 }]);

        assert_eq!(
            json!([{ "id": 1 }, { "id": 2 }, { "name": "x" }, { "id": null }]),
            sorted(records.clone(), SortSpec::ascending("id"))
        );

        assert_eq!(
            json!([{ "id": 2 }, { "id": 1 }, { "name": "x" }, { "id": null }]),
            sorted(records, SortSpec::descending("id"))
        );
    }

    #[test]
    fn mixed_kinds_keep_a_fixed_rank() {
        let records = json!([{ "v": true }, { "v": "a" }, { "v": 3 }, { "v": [1] }]);

        assert_eq!(
            json!([{ "v": 3 }, { "v": "a" }, { "v": true }, { "v": [1] }]),
            sorted(records, SortSpec::descending("v"))
        );
    }

    #[test]
    fn ties_keep_upstream_order() {
        let records = json!([
            { "group": 1, "name": "first" },
            { "group": 0, "name": "second" },
            { "group": 1, "name": "third" },
            { "group": 0, "name": "fourth" },
        ]);

        let once = sorted(records, SortSpec::ascending("group"));
        let twice = sorted(once.clone(), SortSpec::ascending("group"));

        assert_eq!(
            json!([
                { "group": 0, "name": "second" },
                { "group": 0, "name": "fourth" },
                { "group": 1, "name": "first" },
                { "group": 1, "name": "third" },
            ]),
            once
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn large_unsigned_numbers() {
        let records = json!([{ "id": u64::MAX }, { "id": -5 }, { "id": 7 }]);

        assert_eq!(
            json!([{ "id": -5 }, { "id": 7 }, { "id": u64::MAX }]),
            sorted(records, SortSpec::ascending("id"))
        );
    }
}
