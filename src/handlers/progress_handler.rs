use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, auth::AuthenticatedUser, errors::AppError};

#[get("/progress")]
pub async fn get_my_progress(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller = auth.caller();
    let progress = state
        .progress_service
        .progress_for(&caller, &caller.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[get("/progress/{student_id}")]
pub async fn get_student_progress(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state
        .progress_service
        .progress_for(&auth.caller(), &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}
