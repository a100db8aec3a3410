//! Profile handlers: user lookup and profile edits.

use crate::handlers::context::HandlerContext;
use crate::handlers::error::{Result as RpcResult, RpcError};
use crate::handlers::require_user;
use crate::wire::{AckBody, GetUserRequest, ProfileUpdateRequest, ResponsePayload, UserBody};

use sg_core::validation::normalize_username;
use sg_core::{Identity, UserSummary};

use std::panic::Location;

use error_location::ErrorLocation;

/// Resolve the requested account: an explicit username, or the caller's own.
pub(crate) async fn resolve_identity(
    ctx: &HandlerContext,
    username: Option<&str>,
) -> RpcResult<Identity> {
    let found = match username {
        Some(name) => {
            let name = normalize_username(name);
            ctx.services.accounts.find_by_username(&name).await?
        }
        None => {
            let user_id = require_user(ctx)?;
            ctx.services.accounts.find_by_id(user_id).await?
        }
    };

    found.ok_or_else(|| RpcError::NotFound {
        message: "User not found".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

pub async fn handle_get_user(req: GetUserRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let identity = resolve_identity(&ctx, req.username.as_deref()).await?;
    let services = &ctx.services;

    let Some(profile) = services.accounts.profile_of(identity.id).await? else {
        // Accounts and profiles are created in one transaction
        return Err(RpcError::Internal {
            message: format!("No profile for user {}", identity.id),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    let followers = services.graph.count_followers(profile.id).await?;
    let following = services.graph.count_following(profile.id).await?;

    let is_self = ctx.caller.user_id() == Some(identity.id);

    let summary = UserSummary {
        user_id: identity.id,
        username: identity.username,
        full_name: profile.full_name,
        bio: profile.bio,
        email: is_self.then_some(identity.email),
        followers,
        following,
        is_self,
    };

    Ok(ResponsePayload::User(UserBody::from(summary)))
}

pub async fn handle_init_profile(
    req: ProfileUpdateRequest,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    update_own_profile(req, &ctx).await
}

pub async fn handle_change_profile(
    req: ProfileUpdateRequest,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    update_own_profile(req, &ctx).await
}

async fn update_own_profile(
    req: ProfileUpdateRequest,
    ctx: &HandlerContext,
) -> RpcResult<ResponsePayload> {
    let user_id = require_user(ctx)?;
    let services = &ctx.services;

    let Some(profile) = services.accounts.profile_of(user_id).await? else {
        return Err(RpcError::Internal {
            message: format!("No profile for user {user_id}"),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    let updated = services
        .accounts
        .update_profile(
            profile.id,
            req.full_name.as_deref(),
            req.bio.as_deref(),
            req.avatar.as_deref(),
        )
        .await?;

    Ok(ResponsePayload::Ack(AckBody { success: updated }))
}
