use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{CreateAccessRequestInput, DecideAccessRequestInput},
        response::{ApiResponse, MessageResponse},
    },
};

#[derive(Debug, Deserialize)]
pub struct AuthorizationQuery {
    pub student_id: String,
    pub instructor_id: String,
}

#[post("/requests")]
pub async fn create_access_request(
    state: web::Data<AppState>,
    request: web::Json<CreateAccessRequestInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let created = state
        .access_service
        .create_request(&auth.caller(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(created, "Access request sent")))
}

#[get("/requests/received")]
pub async fn list_received_requests(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let requests = state.access_service.list_received(&auth.caller()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[get("/requests/sent")]
pub async fn list_sent_requests(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let requests = state.access_service.list_sent(&auth.caller()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[get("/requests/authorized")]
pub async fn check_authorization(
    state: web::Data<AppState>,
    query: web::Query<AuthorizationQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let authorized = state
        .access_service
        .check_authorization(&auth.caller(), &query.student_id, &query.instructor_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "authorized": authorized })))
}

#[put("/requests/{id}/decision")]
pub async fn decide_access_request(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<DecideAccessRequestInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let decided = state
        .access_service
        .decide(&auth.caller(), &id, request.into_inner())
        .await?;
    let message = format!("Request {}", decided.status);
    Ok(HttpResponse::Ok().json(ApiResponse::new(decided, message)))
}

#[delete("/requests/{id}")]
pub async fn cancel_access_request(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.access_service.cancel(&auth.caller(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Request cancelled")))
}
