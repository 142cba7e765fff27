use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{gql_error, session},
    models::{
        domain::{AccessRequest, ContentItem},
        dto::{
            request::{
                AssignQuizInput, CreateAccessRequestInput, CreateContentInput, CreateQuizInput,
                DecideAccessRequestInput, SubmitQuizInput, UpdateQuizInput,
            },
            response::{MessageResponse, QuizDto, SubmissionResult},
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_access_request(
        &self,
        ctx: &Context<'_>,
        input: CreateAccessRequestInput,
    ) -> async_graphql::Result<AccessRequest> {
        let (state, caller) = session(ctx)?;
        state
            .access_service
            .create_request(&caller, input)
            .await
            .map_err(gql_error)
    }

    async fn decide_access_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: DecideAccessRequestInput,
    ) -> async_graphql::Result<AccessRequest> {
        let (state, caller) = session(ctx)?;
        state
            .access_service
            .decide(&caller, &id, input)
            .await
            .map_err(gql_error)
    }

    async fn cancel_access_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<MessageResponse> {
        let (state, caller) = session(ctx)?;
        state
            .access_service
            .cancel(&caller, &id)
            .await
            .map_err(gql_error)?;
        Ok(MessageResponse::new("Request cancelled"))
    }

    async fn create_quiz(
        &self,
        ctx: &Context<'_>,
        input: CreateQuizInput,
    ) -> async_graphql::Result<QuizDto> {
        let (state, caller) = session(ctx)?;
        let quiz = state
            .quiz_service
            .create_quiz(&caller, input)
            .await
            .map_err(gql_error)?;
        Ok(quiz.into())
    }

    async fn update_quiz(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateQuizInput,
    ) -> async_graphql::Result<QuizDto> {
        let (state, caller) = session(ctx)?;
        let quiz = state
            .quiz_service
            .update_quiz(&caller, &id, input)
            .await
            .map_err(gql_error)?;
        Ok(quiz.into())
    }

    async fn delete_quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<MessageResponse> {
        let (state, caller) = session(ctx)?;
        state
            .quiz_service
            .delete_quiz(&caller, &id)
            .await
            .map_err(gql_error)?;
        Ok(MessageResponse::new("Quiz deleted"))
    }

    async fn assign_quiz(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: AssignQuizInput,
    ) -> async_graphql::Result<QuizDto> {
        let (state, caller) = session(ctx)?;
        let quiz = state
            .quiz_service
            .assign_quiz(&caller, &id, input)
            .await
            .map_err(gql_error)?;
        Ok(quiz.into())
    }

    async fn submit_quiz(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: SubmitQuizInput,
    ) -> async_graphql::Result<SubmissionResult> {
        let (state, caller) = session(ctx)?;
        state
            .submission_service
            .submit(&caller, &id, input)
            .await
            .map_err(gql_error)
    }

    async fn create_content(
        &self,
        ctx: &Context<'_>,
        input: CreateContentInput,
    ) -> async_graphql::Result<ContentItem> {
        let (state, caller) = session(ctx)?;
        state
            .content_service
            .create_content(&caller, input)
            .await
            .map_err(gql_error)
    }

    async fn delete_content(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<MessageResponse> {
        let (state, caller) = session(ctx)?;
        state
            .content_service
            .delete_content(&caller, &id)
            .await
            .map_err(gql_error)?;
        Ok(MessageResponse::new("Content deleted"))
    }
}
