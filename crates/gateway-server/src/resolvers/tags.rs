use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use graphql_cursor::{paginate, PageArgs, SortDirection, SortSpec};
use http::{Method, StatusCode};
use runtime::fetch::{FetchError, UpstreamBody, UpstreamRequest};
use serde_json::{Map, Value};

use super::{entities, error::graphql_error, upstream, PaginationSettings};

const RESOURCE: &str = "tags";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<ID>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub user_id: Option<ID>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub group_id: Option<ID>,
}

#[derive(Debug, Default, InputObject)]
pub struct TagInput {
    pub id: Option<ID>,
    pub name: Option<String>,
    pub user_id: Option<ID>,
    pub group_id: Option<ID>,
}

impl TagInput {
    /// The `{ "tag": { .. } }` envelope the upstream expects, without the fields left out.
    fn into_body(self) -> UpstreamBody {
        let mut tag = Map::new();

        let fields = [
            ("id", self.id.map(|id| id.0)),
            ("name", self.name),
            ("userId", self.user_id.map(|id| id.0)),
            ("groupId", self.group_id.map(|id| id.0)),
        ];

        for (key, value) in fields {
            if let Some(value) = value {
                tag.insert(key.to_string(), Value::String(value));
            }
        }

        let mut envelope = Map::new();
        envelope.insert("tag".to_string(), Value::Object(tag));

        UpstreamBody::Json(Value::Object(envelope))
    }
}

#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct TagFeed {
    pub cursor: String,
    pub has_more: bool,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "camelCase")]
pub enum TagSort {
    Id,
    Name,
    UserId,
    GroupId,
}

impl TagSort {
    fn field(self) -> &'static str {
        match self {
            TagSort::Id => "id",
            TagSort::Name => "name",
            TagSort::UserId => "userId",
            TagSort::GroupId => "groupId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Enum)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl From<Order> for SortDirection {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortDirection::Ascending,
            Order::Desc => SortDirection::Descending,
        }
    }
}

/// Outcome of a delete, as reported by the upstream.
#[derive(Debug, Clone, PartialEq, SimpleObject)]
#[graphql(name = "Response")]
pub struct DeleteResponse {
    pub status: u16,
    /// Only a plain `200 OK` counts as success.
    pub success: bool,
}

#[derive(Default)]
pub struct TagQuery;

#[Object]
impl TagQuery {
    async fn get_tag_by_id(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Tag> {
        let (fetcher, authorization) = upstream(ctx)?;
        let fields = entities::tags().map_err(graphql_error)?;

        let response = fetcher
            .request(UpstreamRequest::new(Method::GET, RESOURCE, authorization, fields).with_id(&id))
            .await
            .map_err(graphql_error)?;

        response.json_as().map_err(graphql_error)
    }

    async fn get_tags(
        &self,
        ctx: &Context<'_>,
        cursor: Option<String>,
        limit: Option<i32>,
        sort_by: Option<TagSort>,
        order_by: Option<Order>,
    ) -> async_graphql::Result<TagFeed> {
        let (fetcher, authorization) = upstream(ctx)?;
        let settings = ctx.data::<PaginationSettings>()?;
        let fields = entities::tags().map_err(graphql_error)?;

        let response = fetcher
            .request(UpstreamRequest::new(Method::GET, RESOURCE, authorization, fields))
            .await
            .map_err(graphql_error)?;

        let Value::Array(tags) = response.json().map_err(graphql_error)? else {
            return Err(graphql_error(FetchError::InvalidResponse(format!(
                "`{RESOURCE}` did not return a list"
            ))));
        };

        let sort = sort_by.map(|sort_by| SortSpec::new(sort_by.field(), order_by.unwrap_or_default().into()));

        let page = paginate(
            tags,
            PageArgs {
                cursor: cursor.as_deref(),
                limit: limit.map(i64::from),
                sort: sort.as_ref(),
                default_limit: settings.default_limit,
            },
        )
        .map_err(graphql_error)?;

        let page = page
            .try_map(serde_json::from_value::<Tag>)
            .map_err(|error| graphql_error(FetchError::InvalidResponse(error.to_string())))?;

        Ok(TagFeed {
            cursor: page.cursor,
            has_more: page.has_more,
            tags: page.items,
        })
    }
}

#[derive(Default)]
pub struct TagMutation;

#[Object]
impl TagMutation {
    async fn create_tag(&self, ctx: &Context<'_>, input: TagInput) -> async_graphql::Result<Tag> {
        let (fetcher, authorization) = upstream(ctx)?;
        let fields = entities::tags().map_err(graphql_error)?;

        let response = fetcher
            .request(UpstreamRequest::new(Method::POST, RESOURCE, authorization, fields).with_body(input.into_body()))
            .await
            .map_err(graphql_error)?;

        response.json_as().map_err(graphql_error)
    }

    async fn update_tag(&self, ctx: &Context<'_>, id: ID, input: TagInput) -> async_graphql::Result<Tag> {
        let (fetcher, authorization) = upstream(ctx)?;
        let fields = entities::tags().map_err(graphql_error)?;

        let request = UpstreamRequest::new(Method::PUT, RESOURCE, authorization, fields)
            .with_id(&id)
            .with_body(input.into_body());

        let response = fetcher.request(request).await.map_err(graphql_error)?;

        response.json_as().map_err(graphql_error)
    }

    async fn delete_tag(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DeleteResponse> {
        let (fetcher, authorization) = upstream(ctx)?;
        let fields = entities::tags().map_err(graphql_error)?;

        let response = fetcher
            .request(UpstreamRequest::new(Method::DELETE, RESOURCE, authorization, fields).with_id(&id))
            .await
            .map_err(graphql_error)?;

        Ok(DeleteResponse {
            status: response.status().as_u16(),
            success: response.status() == StatusCode::OK,
        })
    }
}

/// Upstream ids are numbers, but may come back as strings.
pub(super) fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<ID>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{de::Error, Deserialize};

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(ID(id))),
        Some(Value::Number(id)) => Ok(Some(ID(id.to_string()))),
        Some(other) => Err(D::Error::custom(format!("invalid id `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tags_accept_numeric_and_string_ids() {
        let tag: Tag = serde_json::from_value(json!({
            "id": 3,
            "name": "mri",
            "userId": "2",
            "groupId": null,
            "createdAt": "2024-01-01",
        }))
        .unwrap();

        let expected = Tag {
            id: Some(ID("3".into())),
            name: Some("mri".into()),
            user_id: Some(ID("2".into())),
            group_id: None,
        };

        assert_eq!(expected, tag);
    }

    #[test]
    fn input_body_leaves_out_missing_fields() {
        let input = TagInput {
            name: Some("mri".into()),
            group_id: Some(ID("5".into())),
            ..Default::default()
        };

        let UpstreamBody::Json(body) = input.into_body() else {
            unreachable!("tags are always sent as json");
        };

        assert_eq!(json!({ "tag": { "name": "mri", "groupId": "5" } }), body);
    }
}
