mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::services::{AuthService, RegistrationService};
use crate::features::auth::{
    routes as auth_routes, AuthState, SessionCookies, SessionGate, SessionStore,
};
use crate::features::bookings::{BookingRepository, PgBookingRepository};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::history::{routes as history_routes, HistoryService, PgComplaintRepository};
use crate::features::messages::{routes as messages_routes, MessageService};
use crate::features::schedule::{routes as schedule_routes, ScheduleService};
use crate::features::users::{
    routes as users_routes, AccountRepository, PgAccountRepository, ProfileService,
};
use crate::features::wallet::{routes as wallet_routes, WalletService};
use crate::modules::storage::LocalStorage;
use axum::{extract::State, http::StatusCode, middleware::from_fn, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Repositories
    let accounts: Arc<dyn AccountRepository> = Arc::new(PgAccountRepository::new(pool.clone()));
    let bookings: Arc<dyn BookingRepository> = Arc::new(PgBookingRepository::new(pool.clone()));
    let complaints = Arc::new(PgComplaintRepository::new(pool.clone()));

    // Sessions
    let sessions = Arc::new(SessionStore::new(config.session.ttl));
    sessions.spawn_purge_task(config.session.purge_interval);
    let cookies = SessionCookies::from_config(&config.session);
    let gate = SessionGate::new(
        Arc::clone(&sessions),
        cookies.clone(),
        &config.session.login_path,
    );
    tracing::info!(
        "Session store initialized (cookie: {}, ttl: {:?})",
        cookies.name(),
        config.session.ttl
    );

    // Document storage
    let storage = Arc::new(LocalStorage::from_config(&config.upload));
    storage
        .ensure_folders()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload directory: {}", e))?;
    tracing::info!("Upload storage ready at {}", storage.root().display());

    // Auth services
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&accounts),
        Arc::clone(&sessions),
    ));
    let registration_service = Arc::new(RegistrationService::new(
        Arc::clone(&accounts),
        Arc::clone(&sessions),
        Arc::clone(&storage),
    ));
    let auth_state = AuthState {
        service: auth_service,
        registration: registration_service,
        cookies,
        landing_path: config.session.landing_path.clone(),
        max_file_size: config.upload.max_file_size,
        max_body_size: config.app.max_request_body_size,
    };
    tracing::info!("Auth services initialized");

    let profile_service = Arc::new(ProfileService::new(
        Arc::clone(&accounts),
        Arc::clone(&sessions),
        Arc::clone(&storage),
    ));
    tracing::info!("Profile service initialized");

    let dashboard_service = Arc::new(DashboardService::new(Arc::clone(&bookings)));
    let wallet_service = Arc::new(WalletService::new(Arc::clone(&bookings)));
    let history_service = Arc::new(HistoryService::new(complaints, Arc::clone(&bookings)));
    tracing::info!("Dashboard, wallet and history services initialized");

    let message_service = Arc::new(MessageService::new());
    let schedule_service = Arc::new(ScheduleService::new(
        Arc::clone(&bookings),
        Arc::clone(&message_service),
    ));
    schedule_service.spawn_eviction_task(Arc::clone(&sessions));
    tracing::info!("Schedule and message services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a live session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(auth_state.clone()))
        .merge(users_routes::routes(
            profile_service,
            config.upload.max_file_size,
        ))
        .merge(dashboard_routes::routes(dashboard_service))
        .merge(schedule_routes::routes(schedule_service))
        .merge(wallet_routes::routes(wallet_service))
        .merge(history_routes::routes(history_service))
        .merge(messages_routes::routes(message_service))
        .route_layer(axum::middleware::from_fn_with_state(
            gate,
            middleware::require_session,
        ));

    // Liveness and readiness probes (no session required)
    async fn health_check() -> StatusCode {
        StatusCode::OK
    }
    async fn readiness_check(State(pool): State<PgPool>) -> StatusCode {
        match database::ping(&pool).await {
            Ok(()) => StatusCode::OK,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
    let health_route = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/health/ready", axum::routing::get(readiness_check))
        .with_state(pool.clone());

    // Public routes (no session required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_state))
        .nest_service(
            &config.upload.public_prefix,
            ServeDir::new(&config.upload.root_dir),
        );

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
