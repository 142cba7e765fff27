use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AccessRequest, AccessRequestStatus, Caller, UserRole},
        dto::request::{CreateAccessRequestInput, DecideAccessRequestInput},
    },
    repositories::{AccessRequestRepository, UserRepository},
};

/// Student to instructor access relationships.
///
/// The request records are the only authority on whether a student may see
/// an instructor's material; `is_authorized` is what every gate consults.
pub struct AccessService {
    requests: Arc<dyn AccessRequestRepository>,
    users: Arc<dyn UserRepository>,
}

impl AccessService {
    pub fn new(
        requests: Arc<dyn AccessRequestRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { requests, users }
    }

    pub async fn create_request(
        &self,
        caller: &Caller,
        input: CreateAccessRequestInput,
    ) -> AppResult<AccessRequest> {
        if caller.role != UserRole::Student {
            return Err(AppError::Forbidden(
                "Only students can request access to an instructor".to_string(),
            ));
        }
        input.validate()?;

        let target = self.users.find_by_id(&input.instructor_id).await?;
        if !target.is_some_and(|user| user.is_instructor()) {
            return Err(AppError::InvalidTarget(format!(
                "'{}' is not an instructor",
                input.instructor_id
            )));
        }

        if let Some(existing) = self
            .requests
            .find_active_for_pair(&caller.user_id, &input.instructor_id)
            .await?
        {
            log::warn!(
                "Student {} already has a {} request to instructor {}",
                caller.user_id,
                existing.status,
                input.instructor_id
            );
            return Err(AppError::DuplicateRequest(format!(
                "A {} request to this instructor already exists",
                existing.status
            )));
        }

        // The partial unique index still catches a concurrent duplicate here.
        let request = AccessRequest::new(&caller.user_id, &input.instructor_id, input.message);
        let created = self.requests.create(request).await?;

        log::info!(
            "Access request {} created: student {} -> instructor {}",
            created.id,
            created.student_id,
            created.instructor_id
        );
        Ok(created)
    }

    pub async fn decide(
        &self,
        caller: &Caller,
        request_id: &str,
        input: DecideAccessRequestInput,
    ) -> AppResult<AccessRequest> {
        if caller.role != UserRole::Instructor {
            return Err(AppError::Forbidden(
                "Only instructors can decide access requests".to_string(),
            ));
        }
        input.validate()?;

        let request = self.load(request_id).await?;
        if request.instructor_id != caller.user_id {
            return Err(AppError::Forbidden(
                "This request was not addressed to you".to_string(),
            ));
        }
        if !request.is_pending() {
            return Err(already_decided(&request));
        }

        let updated = request.decided(input.decision, input.reason, Utc::now());
        match self.requests.replace_if_pending(updated).await? {
            Some(stored) => {
                log::info!(
                    "Access request {} {} by instructor {}",
                    stored.id,
                    stored.status,
                    caller.user_id
                );
                Ok(stored)
            }
            // Lost a race with another decision or a cancellation.
            None => match self.requests.find_by_id(request_id).await? {
                Some(current) => Err(already_decided(&current)),
                None => Err(not_found(request_id)),
            },
        }
    }

    pub async fn cancel(&self, caller: &Caller, request_id: &str) -> AppResult<()> {
        let request = self.load(request_id).await?;
        if caller.role != UserRole::Student || request.student_id != caller.user_id {
            return Err(AppError::Forbidden(
                "Only the requesting student can cancel this request".to_string(),
            ));
        }
        if !request.is_pending() {
            return Err(already_decided(&request));
        }

        if !self.requests.delete_if_pending(request_id).await? {
            return match self.requests.find_by_id(request_id).await? {
                Some(current) => Err(already_decided(&current)),
                None => Err(not_found(request_id)),
            };
        }

        log::info!(
            "Access request {} cancelled by student {}",
            request_id,
            caller.user_id
        );
        Ok(())
    }

    pub async fn is_authorized(&self, student_id: &str, instructor_id: &str) -> AppResult<bool> {
        self.requests
            .exists_with_status(student_id, instructor_id, AccessRequestStatus::Accepted)
            .await
    }

    /// `is_authorized` for a caller who is one side of the pair, or an admin.
    pub async fn check_authorization(
        &self,
        caller: &Caller,
        student_id: &str,
        instructor_id: &str,
    ) -> AppResult<bool> {
        if !caller.is_admin() && caller.user_id != student_id && caller.user_id != instructor_id {
            return Err(AppError::Forbidden(
                "You can only check relationships you are part of".to_string(),
            ));
        }
        self.is_authorized(student_id, instructor_id).await
    }

    pub async fn authorized_instructor_ids(&self, student_id: &str) -> AppResult<Vec<String>> {
        self.requests
            .instructor_ids_with_status(student_id, AccessRequestStatus::Accepted)
            .await
    }

    pub async fn list_received(&self, caller: &Caller) -> AppResult<Vec<AccessRequest>> {
        if caller.role != UserRole::Instructor {
            return Err(AppError::Forbidden(
                "Only instructors receive access requests".to_string(),
            ));
        }
        self.requests.list_by_instructor(&caller.user_id).await
    }

    pub async fn list_sent(&self, caller: &Caller) -> AppResult<Vec<AccessRequest>> {
        if caller.role != UserRole::Student {
            return Err(AppError::Forbidden(
                "Only students send access requests".to_string(),
            ));
        }
        self.requests.list_by_student(&caller.user_id).await
    }

    async fn load(&self, request_id: &str) -> AppResult<AccessRequest> {
        self.requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found(request_id))
    }
}

fn not_found(request_id: &str) -> AppError {
    AppError::NotFound(format!("Access request with id '{}' not found", request_id))
}

fn already_decided(request: &AccessRequest) -> AppError {
    AppError::InvalidState(format!(
        "Access request '{}' is {}, not pending",
        request.id, request.status
    ))
}
