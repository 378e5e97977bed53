mod entities;
mod error;
pub(crate) mod sessions;
mod tags;

use async_graphql::{Context, EmptySubscription, MergedObject, Schema};
use runtime::{fetch::Fetcher, ForwardedAuthorization};

pub(crate) use entities::validate as validate_entities;

pub type GatewaySchema = Schema<Query, Mutation, EmptySubscription>;

#[derive(Default, MergedObject)]
pub struct Query(tags::TagQuery, sessions::SessionQuery);

#[derive(Default, MergedObject)]
pub struct Mutation(tags::TagMutation, sessions::SessionMutation);

/// Page size for list queries that give no `limit`.
#[derive(Debug, Clone, Copy)]
pub struct PaginationSettings {
    pub default_limit: usize,
}

/// The schema with its process-wide data. Every request must carry a [`ForwardedAuthorization`].
pub fn build_schema(fetcher: Fetcher, pagination: PaginationSettings, introspection: bool) -> GatewaySchema {
    let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(fetcher)
        .data(pagination);

    if !introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}

fn upstream<'a>(ctx: &Context<'a>) -> async_graphql::Result<(&'a Fetcher, &'a ForwardedAuthorization)> {
    Ok((ctx.data::<Fetcher>()?, ctx.data::<ForwardedAuthorization>()?))
}
