use actix_web::{get, web, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::AuthenticatedUser, graphql::Schema};

/// Runs a GraphQL request with the caller's claims in the query context.
pub async fn graphql_handler(
    schema: web::Data<Schema>,
    auth: AuthenticatedUser,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(auth.0);
    schema.execute(request).await.into()
}

#[get("/graphiql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
