use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{AssignQuizInput, CreateQuizInput, SubmitQuizInput, UpdateQuizInput},
        response::{ApiResponse, MessageResponse, QuizDto},
    },
};

#[post("/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(&auth.caller(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(QuizDto::from(quiz), "Quiz created")))
}

#[get("/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes_for(&auth.caller()).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&auth.caller(), &id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&auth.caller(), &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(QuizDto::from(quiz), "Quiz updated")))
}

#[delete("/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&auth.caller(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz deleted")))
}

#[post("/quizzes/{id}/assign")]
pub async fn assign_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AssignQuizInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .assign_quiz(&auth.caller(), &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(QuizDto::from(quiz), "Quiz assigned")))
}

#[post("/quizzes/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizInput>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .submission_service
        .submit(&auth.caller(), &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(result, "Quiz submitted")))
}

#[get("/quizzes/{id}/submissions")]
pub async fn get_submissions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submissions = state
        .quiz_service
        .get_submissions(&auth.caller(), &id)
        .await?;
    Ok(HttpResponse::Ok().json(submissions))
}
