//! Endpoint handlers.
//!
//! Each data endpoint is registered for both `GET` and `POST`; the OpenAPI document describes
//! the `POST` form, whose body carries the same fields as the `GET` query string.

use crate::error::ApiError;
use crate::params::Params;
use crate::AppState;
use api_shared::{
    CheckRes, ContentRes, DeleteFileReq, DeletePlayerReq, DeleteRes, DeleteSlotReq, EmptySlotRes,
    ErrorRes, FileContentRes, FileInfoRes, FilePathReq, HealthRes, HealthService, OldSlotReq,
    PlayerReq, SlotReq, TransferRes, WriteFileReq, WriteFileRes, WriteSlotReq, WriteSlotRes,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use slotkeeper_core::config::slot_id_from_file_name;
use slotkeeper_types::{PlayerId, SlotId};
use std::path::Path;

fn player_id(raw: &str) -> Result<PlayerId, ApiError> {
    PlayerId::parse(raw).map_err(|e| ApiError::InvalidParameter {
        field: "steamid",
        reason: e.to_string(),
    })
}

fn slot_id(field: &'static str, raw: &str) -> Result<SlotId, ApiError> {
    SlotId::parse(raw).map_err(|e| ApiError::InvalidParameter {
        field,
        reason: e.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - `{"status":"ok"}`
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

/// Empty 200 answer to a bare `OPTIONS` request.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[utoipa::path(
    post,
    path = "/check",
    request_body = PlayerReq,
    responses(
        (status = 200, description = "Whether the player has an active save", body = CheckRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
/// Check whether a player file exists
///
/// # Arguments
/// * `req` - `steamid` of the player
///
/// # Returns
/// * `Ok(Json<CheckRes>)` - `exists` flag and the resolved player file path
/// * `Err(ApiError)` - 400 if `steamid` is missing or unusable as a file name
// No `#[axum::debug_handler]` here: axum-macros 0.4 expands it with an internal
// helper `fn check`, which collides with a handler of the same name.
pub async fn check(
    State(state): State<AppState>,
    Params(req): Params<PlayerReq>,
) -> Result<Json<CheckRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    tracing::info!("Check request for {}", player);
    Ok(Json(state.slots.check(&player)))
}

#[utoipa::path(
    post,
    path = "/player-file",
    request_body = PlayerReq,
    responses(
        (status = 200, description = "Parsed player file", body = ContentRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn player_file(
    State(state): State<AppState>,
    Params(req): Params<PlayerReq>,
) -> Result<Json<ContentRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    Ok(Json(state.slots.player_file(&player)))
}

#[utoipa::path(
    post,
    path = "/slot-file",
    request_body = SlotReq,
    responses(
        (status = 200, description = "Parsed slot file", body = ContentRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn slot_file(
    State(state): State<AppState>,
    Params(req): Params<SlotReq>,
) -> Result<Json<ContentRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id("slot_id", &req.slot_id)?;
    Ok(Json(state.slots.slot_file(&player, &slot)))
}

#[utoipa::path(
    post,
    path = "/transfer",
    request_body = OldSlotReq,
    responses(
        (status = 200, description = "Player file moved into the slot", body = TransferRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
/// Move the player's active save into a slot
///
/// The slot file receives the player file with `slot_id` set, then the player file is removed.
///
/// # Arguments
/// * `req` - `steamid` and the target `old_slot_id`
///
/// # Returns
/// * `Ok(Json<TransferRes>)` - both resolved paths, or `success = false` with the error
/// * `Err(ApiError)` - 400 on missing or invalid parameters
#[axum::debug_handler]
pub async fn transfer(
    State(state): State<AppState>,
    Params(req): Params<OldSlotReq>,
) -> Result<Json<TransferRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id("old_slot_id", &req.old_slot_id)?;
    tracing::info!("Transfer request for {} into slot {}", player, slot);
    Ok(Json(state.slots.transfer(&player, &slot)))
}

#[utoipa::path(
    post,
    path = "/empty-slot",
    request_body = OldSlotReq,
    responses(
        (status = 200, description = "Empty slot written", body = EmptySlotRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn empty_slot(
    State(state): State<AppState>,
    Params(req): Params<OldSlotReq>,
) -> Result<Json<EmptySlotRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id("old_slot_id", &req.old_slot_id)?;
    Ok(Json(state.slots.empty_slot(&player, &slot)))
}

#[utoipa::path(
    post,
    path = "/restore-slot",
    request_body = SlotReq,
    responses(
        (status = 200, description = "Slot copied back to the player file", body = TransferRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
/// Restore a slot as the player's active save
///
/// A missing slot is created empty first. The player file is overwritten with the slot
/// content and `slot_id` is forced to the requested slot.
///
/// # Arguments
/// * `req` - `steamid` and `slot_id`
///
/// # Returns
/// * `Ok(Json<TransferRes>)` - both resolved paths, or `success = false` with the error
/// * `Err(ApiError)` - 400 on missing or invalid parameters
#[axum::debug_handler]
pub async fn restore_slot(
    State(state): State<AppState>,
    Params(req): Params<SlotReq>,
) -> Result<Json<TransferRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id("slot_id", &req.slot_id)?;
    tracing::info!("Restore request for {} from slot {}", player, slot);
    Ok(Json(state.slots.restore(&player, &slot)))
}

#[utoipa::path(
    post,
    path = "/write-slot",
    request_body = WriteSlotReq,
    responses(
        (status = 200, description = "Slot file written", body = WriteSlotRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
/// Write caller-supplied data to a slot file
///
/// `file_name` names the slot, with or without a `.json` suffix. Without `data` the default
/// empty slot document (with a `created` timestamp) is written.
#[axum::debug_handler]
pub async fn write_slot(
    State(state): State<AppState>,
    Params(req): Params<WriteSlotReq>,
) -> Result<Json<WriteSlotRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id_from_file_name(req.file_name.trim()).map_err(|e| {
        ApiError::InvalidParameter {
            field: "file_name",
            reason: e.to_string(),
        }
    })?;
    Ok(Json(state.slots.write_slot(&player, &slot, req.data.as_ref())))
}

#[utoipa::path(
    post,
    path = "/file-content",
    request_body = FilePathReq,
    responses(
        (status = 200, description = "Text content of the file", body = FileContentRes),
        (status = 400, description = "Missing parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn file_content(
    State(state): State<AppState>,
    Params(req): Params<FilePathReq>,
) -> Json<FileContentRes> {
    Json(state.files.content(Path::new(&req.file_path)))
}

#[utoipa::path(
    post,
    path = "/write-file",
    request_body = WriteFileReq,
    responses(
        (status = 200, description = "File written", body = WriteFileRes),
        (status = 400, description = "Missing parameters or invalid JSON", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn write_file(
    State(state): State<AppState>,
    Params(req): Params<WriteFileReq>,
) -> Result<Json<WriteFileRes>, ApiError> {
    let data = req
        .data
        .ok_or_else(|| ApiError::MissingParameters(vec!["data"]))?;
    Ok(Json(state.files.write(Path::new(&req.file_path), &data)))
}

#[utoipa::path(
    post,
    path = "/file-info",
    request_body = FilePathReq,
    responses(
        (status = 200, description = "File metadata", body = FileInfoRes),
        (status = 400, description = "Missing parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn file_info(
    State(state): State<AppState>,
    Params(req): Params<FilePathReq>,
) -> Json<FileInfoRes> {
    Json(state.files.info(Path::new(&req.file_path)))
}

#[utoipa::path(
    post,
    path = "/delete-file",
    request_body = DeleteFileReq,
    responses(
        (status = 200, description = "Delete outcome", body = DeleteRes),
        (status = 400, description = "Missing parameters", body = ErrorRes)
    )
)]
/// Delete a file or an empty directory
///
/// # Arguments
/// * `req` - `file_path`, and `backup` to copy a file into the backup directory first
///
/// # Returns
/// * `Json<DeleteRes>` - `deleted = false` when nothing existed at the path
#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Params(req): Params<DeleteFileReq>,
) -> Json<DeleteRes> {
    Json(state.files.delete(Path::new(&req.file_path), req.backup))
}

#[utoipa::path(
    post,
    path = "/delete-player-file",
    request_body = DeletePlayerReq,
    responses(
        (status = 200, description = "Delete outcome", body = DeleteRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_player_file(
    State(state): State<AppState>,
    Params(req): Params<DeletePlayerReq>,
) -> Result<Json<DeleteRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    Ok(Json(state.slots.delete_player_file(&player, req.backup)))
}

#[utoipa::path(
    post,
    path = "/delete-slot-file",
    request_body = DeleteSlotReq,
    responses(
        (status = 200, description = "Delete outcome", body = DeleteRes),
        (status = 400, description = "Missing or invalid parameters", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_slot_file(
    State(state): State<AppState>,
    Params(req): Params<DeleteSlotReq>,
) -> Result<Json<DeleteRes>, ApiError> {
    let player = player_id(&req.steamid)?;
    let slot = slot_id("slot_id", &req.slot_id)?;
    Ok(Json(state.slots.delete_slot_file(&player, &slot, req.backup)))
}
