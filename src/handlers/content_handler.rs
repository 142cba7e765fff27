use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::CreateContentInput,
        response::{ApiResponse, MessageResponse},
    },
};

#[post("/contents")]
pub async fn create_content(
    state: web::Data<AppState>,
    request: web::Json<CreateContentInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let item = state
        .content_service
        .create_content(&auth.caller(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(item, "Content created")))
}

#[get("/contents")]
pub async fn list_contents(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let items = state.content_service.list_content_for(&auth.caller()).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/contents/{id}")]
pub async fn get_content(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let item = state.content_service.get_content(&auth.caller(), &id).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[delete("/contents/{id}")]
pub async fn delete_content(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.content_service.delete_content(&auth.caller(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Content deleted")))
}
