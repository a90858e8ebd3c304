use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::users::handlers;
use crate::features::users::services::ProfileService;

#[derive(Clone)]
pub struct ProfileState {
    pub service: Arc<ProfileService>,
    pub max_file_size: usize,
}

pub fn routes(service: Arc<ProfileService>, max_file_size: usize) -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile)
                .post(handlers::apply_profile_action)
                // multipart overhead on top of one file
                .layer(DefaultBodyLimit::max(max_file_size + 1024 * 1024)),
        )
        .with_state(ProfileState {
            service,
            max_file_size,
        })
}
