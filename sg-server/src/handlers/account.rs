//! Account lifecycle handlers: signup, login, logout, probes, rename.

use crate::handlers::context::HandlerContext;
use crate::handlers::error::{Result as RpcResult, RpcError};
use crate::handlers::require_user;
use crate::wire::{
    AckBody, ChangeUsernameRequest, EmailProbe, LoginRequest, ResponsePayload, SessionBody,
    SignupRequest, UsernameProbe,
};

use sg_core::validation::{
    normalize_email, normalize_username, validate_email, validate_password, validate_username,
};
use sg_core::Identity;

use std::panic::Location;

use error_location::ErrorLocation;
use log::info;

const BAD_CREDENTIALS: &str = "Username or password is incorrect";

/// Create the account and immediately open its first session.
pub async fn handle_signup(req: SignupRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let username = normalize_username(&req.username);
    validate_username(&username)?;

    let email = normalize_email(&req.email);
    validate_email(&email)?;

    validate_password(&req.password)?;

    let services = &ctx.services;

    // Pre-checks give precise field errors; the unique index still backstops races
    if services.accounts.username_exists(&username).await? {
        return Err(RpcError::AlreadyExists {
            message: "Username is already taken".to_string(),
            field: Some("username".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if services.accounts.email_exists(&email).await? {
        return Err(RpcError::AlreadyExists {
            message: "Email is already registered".to_string(),
            field: Some("email".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let password_hash = services.vault.hash(&req.password)?;
    let identity = Identity::new(username, email, password_hash);

    services.accounts.create_account(&identity).await?;
    let session_token = services.policy.begin(identity.id).await?;

    info!(
        "{} Account created: {} ({})",
        ctx.log_prefix(),
        identity.username,
        identity.id
    );

    Ok(ResponsePayload::Session(SessionBody { session_token }))
}

pub async fn handle_login(req: LoginRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let username = normalize_username(&req.username);
    let services = &ctx.services;

    // Same answer for unknown user and wrong password
    let Some(identity) = services.accounts.find_by_username(&username).await? else {
        return Err(RpcError::Unauthenticated {
            message: BAD_CREDENTIALS.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    if !services.vault.verify(&identity.password_hash, &req.password) {
        return Err(RpcError::Unauthenticated {
            message: BAD_CREDENTIALS.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if !identity.active || !can_login(&ctx, &identity).await? {
        return Err(RpcError::Validation {
            message: "This account is not permitted to log in".to_string(),
            field: None,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let session_token = services.policy.begin(identity.id).await?;

    info!("{} Login: {}", ctx.log_prefix(), identity.username);

    Ok(ResponsePayload::Session(SessionBody { session_token }))
}

async fn can_login(ctx: &HandlerContext, identity: &Identity) -> RpcResult<bool> {
    let services = &ctx.services;

    let Some(profile) = services.accounts.profile_of(identity.id).await? else {
        return Ok(false);
    };

    Ok(services
        .accounts
        .status_of(profile.status_id)
        .await?
        .is_some_and(|status| status.can_login))
}

pub async fn handle_logout(ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let Some(token) = ctx.caller.token() else {
        return Err(RpcError::Unauthenticated {
            message: "No session to log out".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    ctx.services.sessions.delete(token).await?;

    info!("{} Logout", ctx.log_prefix());

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}

pub async fn handle_is_logged_in(ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    Ok(ResponsePayload::Ack(AckBody {
        success: ctx.caller.user_id().is_some(),
    }))
}

pub async fn handle_is_username_available(
    req: UsernameProbe,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    let username = normalize_username(&req.username);
    validate_username(&username)?;

    let taken = ctx.services.accounts.username_exists(&username).await?;

    Ok(ResponsePayload::Ack(AckBody { success: !taken }))
}

pub async fn handle_is_email_available(
    req: EmailProbe,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    let email = normalize_email(&req.email);
    validate_email(&email)?;

    let taken = ctx.services.accounts.email_exists(&email).await?;

    Ok(ResponsePayload::Ack(AckBody { success: !taken }))
}

pub async fn handle_change_username(
    req: ChangeUsernameRequest,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    let user_id = require_user(&ctx)?;

    let username = normalize_username(&req.username);
    validate_username(&username)?;

    let services = &ctx.services;

    let Some(current) = services.accounts.find_by_id(user_id).await? else {
        return Err(RpcError::NotFound {
            message: "User not found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    // Renaming to the current name is a successful no-op
    if current.username == username {
        return Ok(ResponsePayload::Ack(AckBody { success: true }));
    }

    if services.accounts.username_exists(&username).await? {
        return Err(RpcError::AlreadyExists {
            message: "Username is already taken".to_string(),
            field: Some("username".to_string()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    services.accounts.rename(user_id, &username).await?;

    info!(
        "{} Username changed: {} -> {}",
        ctx.log_prefix(),
        current.username,
        username
    );

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}
