use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::model::SessionUser;
use crate::features::users::dtos::{
    ProfileActionFormDto, ProfileActionResponseDto, ProfileResponseDto,
};
use crate::features::users::forms::ProfileAction;
use crate::features::users::routes::ProfileState;
use crate::shared::multipart::FormData;
use crate::shared::types::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 303, description = "No session, redirect to login"),
        (status = 404, description = "Account not found")
    ),
    tag = "profile",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_profile(
    user: SessionUser,
    State(state): State<ProfileState>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = state.service.get_profile(&user).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Apply one profile action, selected by the `action` form field
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body(
        content = ProfileActionFormDto,
        content_type = "multipart/form-data",
        description = "Profile form; fields depend on `action`",
    ),
    responses(
        (status = 200, description = "Action applied", body = ApiResponse<ProfileActionResponseDto>),
        (status = 303, description = "No session, redirect to login"),
        (status = 400, description = "Unknown action or validation error"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Upload failed")
    ),
    tag = "profile",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn apply_profile_action(
    user: SessionUser,
    State(state): State<ProfileState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ProfileActionResponseDto>>> {
    let form = FormData::from_multipart(&mut multipart, state.max_file_size).await?;
    let action = ProfileAction::from_form(form)?;

    let outcome = state.service.apply(&user, action).await?;
    Ok(Json(ApiResponse::success(
        Some(outcome.body),
        Some(outcome.message),
        None,
    )))
}
