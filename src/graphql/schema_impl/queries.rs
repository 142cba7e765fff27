use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{gql_error, session},
    models::{
        domain::{AccessRequest, ContentItem, StudentProgress},
        dto::response::{QuizSummary, QuizView, SubmissionView},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn received_requests(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AccessRequest>> {
        let (state, caller) = session(ctx)?;
        state
            .access_service
            .list_received(&caller)
            .await
            .map_err(gql_error)
    }

    async fn sent_requests(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AccessRequest>> {
        let (state, caller) = session(ctx)?;
        state.access_service.list_sent(&caller).await.map_err(gql_error)
    }

    async fn is_authorized(
        &self,
        ctx: &Context<'_>,
        student_id: ID,
        instructor_id: ID,
    ) -> async_graphql::Result<bool> {
        let (state, caller) = session(ctx)?;
        state
            .access_service
            .check_authorization(&caller, &student_id, &instructor_id)
            .await
            .map_err(gql_error)
    }

    async fn quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<QuizView> {
        let (state, caller) = session(ctx)?;
        state
            .quiz_service
            .get_quiz(&caller, &id)
            .await
            .map_err(gql_error)
    }

    async fn quizzes(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<QuizSummary>> {
        let (state, caller) = session(ctx)?;
        state
            .quiz_service
            .list_quizzes_for(&caller)
            .await
            .map_err(gql_error)
    }

    async fn submissions(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
    ) -> async_graphql::Result<Vec<SubmissionView>> {
        let (state, caller) = session(ctx)?;
        state
            .quiz_service
            .get_submissions(&caller, &quiz_id)
            .await
            .map_err(gql_error)
    }

    /// Defaults to the caller's own progress.
    async fn student_progress(
        &self,
        ctx: &Context<'_>,
        student_id: Option<ID>,
    ) -> async_graphql::Result<StudentProgress> {
        let (state, caller) = session(ctx)?;
        let student_id = student_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| caller.user_id.clone());
        state
            .progress_service
            .progress_for(&caller, &student_id)
            .await
            .map_err(gql_error)
    }

    async fn contents(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ContentItem>> {
        let (state, caller) = session(ctx)?;
        state
            .content_service
            .list_content_for(&caller)
            .await
            .map_err(gql_error)
    }

    async fn content(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<ContentItem> {
        let (state, caller) = session(ctx)?;
        state
            .content_service
            .get_content(&caller, &id)
            .await
            .map_err(gql_error)
    }
}
