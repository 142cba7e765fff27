pub mod access_request_handler;
pub mod content_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod progress_handler;
pub mod quiz_handler;

use actix_web::web;

pub use graphql_handler::{graphiql, graphql_handler};
pub use health_handler::{health_check, health_check_ready};

/// Routes mounted under the authenticated `/api` scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(access_request_handler::create_access_request)
        .service(access_request_handler::list_received_requests)
        .service(access_request_handler::list_sent_requests)
        .service(access_request_handler::check_authorization)
        .service(access_request_handler::decide_access_request)
        .service(access_request_handler::cancel_access_request)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::assign_quiz)
        .service(quiz_handler::submit_quiz)
        .service(quiz_handler::get_submissions)
        .service(progress_handler::get_my_progress)
        .service(progress_handler::get_student_progress)
        .service(content_handler::create_content)
        .service(content_handler::list_contents)
        .service(content_handler::get_content)
        .service(content_handler::delete_content);
}
