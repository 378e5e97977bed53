use serde_json::Value;

use crate::{sort, GraphqlCursor, PaginationError, SortSpec};

/// Page size used when the client doesn't ask for one.
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Resumes right after the last item of this page.
    pub cursor: String,
    pub has_more: bool,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            cursor: self.cursor,
            has_more: self.has_more,
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PageArgs<'a> {
    pub cursor: Option<&'a str>,
    /// Zero or negative limits produce an empty page.
    pub limit: Option<i64>,
    pub sort: Option<&'a SortSpec>,
    pub default_limit: usize,
}

impl Default for PageArgs<'_> {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: None,
            sort: None,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Sorts the complete result set and cuts out the page starting at the cursor.
///
/// Calling this again with the returned cursor, against the same collection and sort, yields the
/// next contiguous slice. A cursor that cannot be decoded is an error and never restarts from the
/// beginning.
pub fn paginate(mut results: Vec<Value>, args: PageArgs<'_>) -> Result<Page<Value>, PaginationError> {
    if let Some(spec) = args.sort {
        sort::sort_records(&mut results, spec);
    }

    let offset = match args.cursor {
        Some(cursor) => cursor.parse::<GraphqlCursor>()?.offset(),
        None => 0,
    };

    let limit = match args.limit {
        Some(limit) => usize::try_from(limit).unwrap_or(0),
        None => args.default_limit,
    };

    let total = results.len();
    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);

    let items: Vec<Value> = results.drain(start..end).collect();
    let next = offset.saturating_add(items.len());

    Ok(Page {
        cursor: GraphqlCursor::from_offset(next).encode(),
        has_more: next < total,
        items,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ids(page: &Page<Value>) -> Vec<i64> {
        page.items.iter().filter_map(|item| item["id"].as_i64()).collect()
    }

    fn records(ids: impl IntoIterator<Item = i64>) -> Vec<Value> {
        ids.into_iter().map(|id| json!({ "id": id })).collect()
    }

    #[test]
    fn first_and_second_page() {
        let results = records([3, 1, 2]);
        let sort = SortSpec::ascending("id");

        let first = paginate(
            results.clone(),
            PageArgs {
                limit: Some(2),
                sort: Some(&sort),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(vec![1, 2], ids(&first));
        assert!(first.has_more);
        assert_eq!(GraphqlCursor::from_offset(2).encode(), first.cursor);

        let second = paginate(
            results,
            PageArgs {
                cursor: Some(&first.cursor),
                limit: Some(2),
                sort: Some(&sort),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(vec![3], ids(&second));
        assert!(!second.has_more);
        assert_eq!(GraphqlCursor::from_offset(3).encode(), second.cursor);
    }

    #[test]
    fn following_cursors_visits_every_record_once() {
        let results = records([5, 3, 9, 1, 7, 2, 8, 6, 4, 10, 0]);
        let sort = SortSpec::descending("id");

        for limit in 1..=12 {
            let mut cursor: Option<String> = None;
            let mut seen = Vec::new();

            loop {
                let page = paginate(
                    results.clone(),
                    PageArgs {
                        cursor: cursor.as_deref(),
                        limit: Some(limit),
                        sort: Some(&sort),
                        ..Default::default()
                    },
                )
                .unwrap();

                assert!(page.items.len() <= limit as usize);
                seen.extend(ids(&page));

                if !page.has_more {
                    break;
                }

                cursor = Some(page.cursor);
            }

            assert_eq!((0..=10).rev().collect::<Vec<_>>(), seen, "limit {limit}");
        }
    }

    #[test]
    fn default_limit_applies_without_a_limit() {
        let page = paginate(records(0..25), PageArgs::default()).unwrap();

        assert_eq!(DEFAULT_LIMIT, page.items.len());
        assert!(page.has_more);

        let page = paginate(
            records(0..25),
            PageArgs {
                default_limit: 5,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(vec![0, 1, 2, 3, 4], ids(&page));
    }

    #[test]
    fn unsorted_keeps_upstream_order() {
        let page = paginate(records([3, 1, 2]), PageArgs::default()).unwrap();

        assert_eq!(vec![3, 1, 2], ids(&page));
        assert!(!page.has_more);
    }

    #[test]
    fn non_positive_limit_gives_an_empty_page() {
        for limit in [0, -3] {
            let page = paginate(
                records([1, 2]),
                PageArgs {
                    limit: Some(limit),
                    ..Default::default()
                },
            )
            .unwrap();

            assert!(page.items.is_empty());
            assert!(page.has_more);
            assert_eq!(GraphqlCursor::from_offset(0).encode(), page.cursor);
        }

        let page = paginate(
            Vec::new(),
            PageArgs {
                limit: Some(0),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!page.has_more);
    }

    #[test]
    fn cursor_past_the_end() {
        let cursor = GraphqlCursor::from_offset(10).encode();

        let page = paginate(
            records([1, 2]),
            PageArgs {
                cursor: Some(&cursor),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn corrupt_cursor_is_an_error() {
        let error = paginate(
            records([1, 2]),
            PageArgs {
                cursor: Some("definitely-not-a-cursor"),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert_eq!(PaginationError::InvalidCursor("definitely-not-a-cursor".into()), error);
    }

    #[test]
    fn page_serializes_in_camel_case() {
        let page = paginate(records([1]), PageArgs::default()).unwrap();

        insta::assert_json_snapshot!(page, @r#"
        {
          "cursor": "AQAAAAAAAAAB",
          "hasMore": false,
          "items": [
            {
              "id": 1
            }
          ]
        }
        "#);
    }
}
