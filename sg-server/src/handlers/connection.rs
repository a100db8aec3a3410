//! Connection handlers: follow/block mutations and listing endpoints.

use crate::handlers::context::HandlerContext;
use crate::handlers::error::{Result as RpcResult, RpcError};
use crate::handlers::profile::resolve_identity;
use crate::handlers::require_user;
use crate::wire::{
    AckBody, ConnectionEntry, ConnectionsBody, EdgeRequest, PageRequest, ResponsePayload,
};

use sg_graph::PageCursor;

use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

/// The caller's own profile id.
async fn own_profile(ctx: &HandlerContext) -> RpcResult<Uuid> {
    let user_id = require_user(ctx)?;

    match ctx.services.accounts.profile_of(user_id).await? {
        Some(profile) => Ok(profile.id),
        None => Err(RpcError::Internal {
            message: format!("No profile for user {user_id}"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// The profile behind a username named in a request.
async fn target_profile(ctx: &HandlerContext, username: &str) -> RpcResult<Uuid> {
    let identity = resolve_identity(ctx, Some(username)).await?;

    match ctx.services.accounts.profile_of(identity.id).await? {
        Some(profile) => Ok(profile.id),
        None => Err(RpcError::NotFound {
            message: "User not found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

pub async fn handle_follow(req: EdgeRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let creator = own_profile(&ctx).await?;
    let target = target_profile(&ctx, &req.username).await?;

    ctx.services.graph.follow(creator, target).await?;

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}

pub async fn handle_unfollow(req: EdgeRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let creator = own_profile(&ctx).await?;
    let target = target_profile(&ctx, &req.username).await?;

    ctx.services.graph.unfollow(creator, target).await?;

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}

pub async fn handle_block(req: EdgeRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let creator = own_profile(&ctx).await?;
    let target = target_profile(&ctx, &req.username).await?;

    ctx.services.graph.block(creator, target).await?;

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}

pub async fn handle_unblock(req: EdgeRequest, ctx: HandlerContext) -> RpcResult<ResponsePayload> {
    let creator = own_profile(&ctx).await?;
    let target = target_profile(&ctx, &req.username).await?;

    ctx.services.graph.unblock(creator, target).await?;

    Ok(ResponsePayload::Ack(AckBody { success: true }))
}

pub async fn handle_get_followers(
    req: PageRequest,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    let profile = listed_profile(&ctx, req.username.as_deref()).await?;
    let cursor = req.cursor.as_deref().map(parse_cursor).transpose()?;

    let page = ctx
        .services
        .graph
        .followers(profile, cursor, req.page_size)
        .await?;

    Ok(to_connections_body(page))
}

pub async fn handle_get_following(
    req: PageRequest,
    ctx: HandlerContext,
) -> RpcResult<ResponsePayload> {
    let profile = listed_profile(&ctx, req.username.as_deref()).await?;
    let cursor = req.cursor.as_deref().map(parse_cursor).transpose()?;

    let page = ctx
        .services
        .graph
        .following(profile, cursor, req.page_size)
        .await?;

    Ok(to_connections_body(page))
}

async fn listed_profile(ctx: &HandlerContext, username: Option<&str>) -> RpcResult<Uuid> {
    match username {
        Some(name) => target_profile(ctx, name).await,
        None => own_profile(ctx).await,
    }
}

fn to_connections_body(page: sg_graph::ConnectionPage) -> ResponsePayload {
    ResponsePayload::Connections(ConnectionsBody {
        entries: page
            .entries
            .into_iter()
            .map(|row| ConnectionEntry {
                user_id: row.user_id,
                username: row.username,
                full_name: row.full_name,
            })
            .collect(),
        next_cursor: page.next_cursor.map(encode_cursor),
    })
}

fn encode_cursor(cursor: PageCursor) -> String {
    format!("{}:{}", cursor.created_at, cursor.connection_id.as_simple())
}

fn parse_cursor(raw: &str) -> RpcResult<PageCursor> {
    let parsed = raw.split_once(':').and_then(|(created_at, id)| {
        Some(PageCursor {
            created_at: created_at.parse().ok()?,
            connection_id: Uuid::try_parse(id).ok()?,
        })
    });

    parsed.ok_or_else(|| RpcError::InvalidMessage {
        message: "Malformed page cursor".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
