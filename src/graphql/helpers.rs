use async_graphql::{Context, ErrorExtensions};

use crate::{app_state::AppState, auth::caller_from_context, errors::AppError, models::domain::Caller};

/// Shared state plus the authenticated caller for a resolver.
pub fn session<'a>(ctx: &Context<'a>) -> async_graphql::Result<(&'a AppState, Caller)> {
    let state = ctx.data::<AppState>()?;
    let caller = caller_from_context(ctx).map_err(gql_error)?;
    Ok((state, caller))
}

/// Converts an `AppError` into a GraphQL error carrying its `code` extension.
pub fn gql_error(err: AppError) -> async_graphql::Error {
    err.extend()
}
