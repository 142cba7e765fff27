use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::{Caller, UserRole},
};

pub fn require_role(caller: &Caller, role: UserRole) -> AppResult<()> {
    if caller.role != role {
        return Err(AppError::Forbidden(format!(
            "Only {}s can perform this action",
            role
        )));
    }
    Ok(())
}

pub fn require_owner_or_admin(caller: &Caller, resource_owner: &str) -> AppResult<()> {
    if !caller.is_admin() && caller.user_id != resource_owner {
        return Err(AppError::Forbidden(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}

pub fn caller_from_context(ctx: &Context<'_>) -> AppResult<Caller> {
    extract_claims_from_context(ctx).map(|claims| claims.caller())
}
