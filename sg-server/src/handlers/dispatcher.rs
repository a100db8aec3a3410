//! Dispatch incoming RPC requests to their handlers.
//!
//! Every request passes the auth gate first, then runs under a timeout.
//! Handler errors are translated to wire error payloads here; handlers
//! themselves never build error responses.

use crate::handlers::context::{HandlerContext, Services};
use crate::handlers::error::RpcError;
use crate::handlers::response_builder::{build_error_response, build_response};
use crate::handlers::{account, connection, profile};
use crate::wire::{ErrorBody, RequestPayload, RpcRequest, RpcResponse};

use sg_auth::AuthGate;

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{error, info, warn};

pub struct RpcDispatcher {
    gate: AuthGate,
    services: Arc<Services>,
    handler_timeout: Duration,
}

impl RpcDispatcher {
    pub fn new(gate: AuthGate, services: Arc<Services>, handler_timeout: Duration) -> Self {
        Self {
            gate,
            services,
            handler_timeout,
        }
    }

    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let message_id = request.message_id.clone();

        // No payload means no method name, so there is nothing to
        // authenticate against; reject the envelope before the gate runs.
        if request.payload.is_none() {
            let rpc_error = RpcError::InvalidMessage {
                message: "Missing message payload".to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            warn!("Rejected malformed envelope: {rpc_error}");
            return build_error_response(&message_id, rpc_error.to_wire_error());
        }

        let handler_name = payload_to_handler_name(&request.payload);

        let caller = match self
            .gate
            .authenticate(handler_name, &request.metadata)
            .await
        {
            Ok(caller) => caller,
            Err(e) => {
                let rpc_error = RpcError::from(e);
                warn!("Rejected {handler_name}: {rpc_error}");
                return build_error_response(&message_id, rpc_error.to_wire_error());
            }
        };

        let ctx = HandlerContext::new(caller, Arc::clone(&self.services), &message_id);

        info!("{} -> {}", ctx.log_prefix(), handler_name);

        let response = tokio::time::timeout(
            self.handler_timeout,
            Self::dispatch_inner(request, ctx.clone()),
        )
        .await;

        let final_response = match response {
            Ok(resp) => resp,
            Err(_elapsed) => {
                error!(
                    "{} Handler {} timed out after {:?}",
                    ctx.log_prefix(),
                    handler_name,
                    self.handler_timeout
                );
                build_error_response(
                    &message_id,
                    ErrorBody {
                        code: "TIMEOUT".to_string(),
                        message: "Request timed out. Please try again.".to_string(),
                        field: None,
                    },
                )
            }
        };

        info!(
            "{} <- {} completed in {}ms",
            ctx.log_prefix(),
            handler_name,
            ctx.request_ctx.elapsed_ms()
        );

        final_response
    }

    async fn dispatch_inner(request: RpcRequest, ctx: HandlerContext) -> RpcResponse {
        let message_id = request.message_id;
        let handler_name = payload_to_handler_name(&request.payload);
        let log_prefix = ctx.log_prefix();

        let result = match request.payload {
            // Account handlers
            Some(RequestPayload::Signup(req)) => account::handle_signup(req, ctx).await,
            Some(RequestPayload::Login(req)) => account::handle_login(req, ctx).await,
            Some(RequestPayload::Logout) => account::handle_logout(ctx).await,
            Some(RequestPayload::IsLoggedIn) => account::handle_is_logged_in(ctx).await,
            Some(RequestPayload::IsUsernameAvailable(req)) => {
                account::handle_is_username_available(req, ctx).await
            }
            Some(RequestPayload::IsEmailAvailable(req)) => {
                account::handle_is_email_available(req, ctx).await
            }
            Some(RequestPayload::ChangeUsername(req)) => {
                account::handle_change_username(req, ctx).await
            }

            // Profile handlers
            Some(RequestPayload::GetUser(req)) => profile::handle_get_user(req, ctx).await,
            Some(RequestPayload::InitProfile(req)) => profile::handle_init_profile(req, ctx).await,
            Some(RequestPayload::ChangeProfile(req)) => {
                profile::handle_change_profile(req, ctx).await
            }

            // Connection handlers
            Some(RequestPayload::Follow(req)) => connection::handle_follow(req, ctx).await,
            Some(RequestPayload::Unfollow(req)) => connection::handle_unfollow(req, ctx).await,
            Some(RequestPayload::Block(req)) => connection::handle_block(req, ctx).await,
            Some(RequestPayload::Unblock(req)) => connection::handle_unblock(req, ctx).await,
            Some(RequestPayload::GetFollowers(req)) => {
                connection::handle_get_followers(req, ctx).await
            }
            Some(RequestPayload::GetFollowing(req)) => {
                connection::handle_get_following(req, ctx).await
            }

            // Missing payload
            None => Err(RpcError::InvalidMessage {
                message: "Missing message payload".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        match result {
            Ok(payload) => build_response(&message_id, payload),
            Err(e) => {
                let wire_error = e.to_wire_error();
                warn!(
                    "{} Handler {} failed: {} (code: {})",
                    log_prefix, handler_name, e, wire_error.code
                );
                build_error_response(&message_id, wire_error)
            }
        }
    }
}

/// Handler names are the wire-level method tags; the auth allow-list is
/// expressed in the same vocabulary.
fn payload_to_handler_name(payload: &Option<RequestPayload>) -> &'static str {
    match payload {
        // Account
        Some(RequestPayload::Signup(_)) => "signup",
        Some(RequestPayload::Login(_)) => "login",
        Some(RequestPayload::Logout) => "logout",
        Some(RequestPayload::IsLoggedIn) => "is_logged_in",
        Some(RequestPayload::IsUsernameAvailable(_)) => "is_username_available",
        Some(RequestPayload::IsEmailAvailable(_)) => "is_email_available",
        Some(RequestPayload::ChangeUsername(_)) => "change_username",

        // Profile
        Some(RequestPayload::GetUser(_)) => "get_user",
        Some(RequestPayload::InitProfile(_)) => "init_profile",
        Some(RequestPayload::ChangeProfile(_)) => "change_profile",

        // Connections
        Some(RequestPayload::Follow(_)) => "follow",
        Some(RequestPayload::Unfollow(_)) => "unfollow",
        Some(RequestPayload::Block(_)) => "block",
        Some(RequestPayload::Unblock(_)) => "unblock",
        Some(RequestPayload::GetFollowers(_)) => "get_followers",
        Some(RequestPayload::GetFollowing(_)) => "get_following",

        None => "unknown",
    }
}
