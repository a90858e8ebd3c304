use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, RegisterFormDto, RegistrationStepDto,
};
use crate::features::auth::model::SessionUser;
use crate::features::auth::services::{AuthService, RegistrationOutcome, RegistrationService};
use crate::features::auth::session_cookie::SessionCookies;
use crate::shared::multipart::FormData;
use crate::shared::types::ApiResponse;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
    pub registration: Arc<RegistrationService>,
    pub cookies: SessionCookies,
    pub landing_path: String,
    pub max_file_size: usize,
    pub max_body_size: usize,
}

/// Login with email and password
///
/// Any session the request carried is ended first; the session cookie is cleared even
/// when the attempt fails.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Response {
    let prior_session = state.cookies.read(&jar);
    let jar = jar.remove(state.cookies.clear());

    match state.service.login(prior_session, dto).await {
        Ok((session, response)) => {
            let jar = jar.add(state.cookies.issue(session.session_id));
            (
                jar,
                Json(ApiResponse::success(
                    Some(response),
                    Some("Login successful".to_string()),
                    None,
                )),
            )
                .into_response()
        }
        Err(err) => (jar, err).into_response(),
    }
}

/// End the current session and return to the landing page
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 303, description = "Session ended, redirect to the landing page")
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> (CookieJar, Redirect) {
    state.service.logout(state.cookies.read(&jar)).await;
    (
        jar.remove(state.cookies.clear()),
        Redirect::to(&state.landing_path),
    )
}

/// Get the identity cached in the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 303, description = "No session, redirect to login")
    ),
    tag = "auth",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_me(user: SessionUser) -> Json<ApiResponse<MeResponseDto>> {
    Json(ApiResponse::success(Some(MeResponseDto::from(user)), None, None))
}

/// Register a new driver
///
/// `step` 1 and 2 only validate their part of the form. The final step stores the
/// documents, creates a pending account and signs the driver in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body(
        content = RegisterFormDto,
        content_type = "multipart/form-data",
        description = "Registration form with optional document images",
    ),
    responses(
        (status = 200, description = "Intermediate step is valid", body = ApiResponse<RegistrationStepDto>),
        (status = 201, description = "Driver registered and signed in", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Registration failed")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response> {
    let form = FormData::from_multipart(&mut multipart, state.max_file_size).await?;

    match state.registration.submit(form).await? {
        RegistrationOutcome::StepValidated(step) => Ok(Json(ApiResponse::success(
            Some(RegistrationStepDto { step, valid: true }),
            Some(format!("Step {} is valid", step)),
            None,
        ))
        .into_response()),
        RegistrationOutcome::Registered { session, response } => {
            state.service.logout(state.cookies.read(&jar)).await;
            let jar = jar.add(state.cookies.issue(session.session_id));
            Ok((
                StatusCode::CREATED,
                jar,
                Json(ApiResponse::success(
                    Some(response),
                    Some("Registration successful".to_string()),
                    None,
                )),
            )
                .into_response())
        }
    }
}
