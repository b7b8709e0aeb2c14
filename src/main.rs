mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::api_keys::{routes as api_keys_routes, ApiKeyService};
use crate::features::assignments::{
    routes as assignments_routes, AssignmentService, PgAssignmentRepository, TransitionPolicy,
};
use crate::features::audit_logs::{
    routes as audit_logs_routes, AuditLogService, PgAuditLogRepository,
};
use crate::features::auth;
use crate::features::auth::routes as auth_routes;
use crate::features::export::{routes as export_routes, ExportService};
use crate::features::notifications::{routes as notifications_routes, NotificationHub};
use crate::features::operations::{
    routes as operations_routes, OperationService, PgOperationRepository,
};
use crate::features::organizations::{routes as organizations_routes, OrganizationService};
use crate::features::reports::{routes as reports_routes, PgReportRepository, ReportService};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
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
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwt_validator = Arc::new(auth::JwtValidator::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    // Initialize cross-cutting services
    let audit_service = Arc::new(AuditLogService::new(Arc::new(PgAuditLogRepository::new(
        pool.clone(),
    ))));
    let notification_hub = Arc::new(NotificationHub::new(config.notifications.channel_capacity));
    tracing::info!(
        "Notification hub initialized (capacity: {})",
        config.notifications.channel_capacity
    );

    // Initialize domain services
    let report_repository = Arc::new(PgReportRepository::new(pool.clone()));
    let assignment_repository = Arc::new(PgAssignmentRepository::new(pool.clone()));

    let report_service = Arc::new(ReportService::new(
        report_repository.clone(),
        Arc::clone(&audit_service),
        Arc::clone(&notification_hub),
    ));
    let assignment_service = Arc::new(AssignmentService::new(
        assignment_repository.clone(),
        Arc::clone(&report_service),
        Arc::clone(&audit_service),
        Arc::clone(&notification_hub),
        TransitionPolicy::from(&config.assignments),
    ));
    tracing::info!(
        "Assignment service initialized (decline after accept: {})",
        config.assignments.allow_decline_after_accept
    );

    let operation_service = Arc::new(OperationService::new(
        Arc::new(PgOperationRepository::new(pool.clone())),
        Arc::clone(&report_service),
        Arc::clone(&audit_service),
        Arc::clone(&notification_hub),
    ));
    let organization_service = Arc::new(OrganizationService::new(
        pool.clone(),
        config.assignments.stale_pending_hours,
    ));
    tracing::info!("Operation and organization services initialized");

    // Initialize admin services
    let api_key_service = Arc::new(ApiKeyService::new(
        pool.clone(),
        Arc::clone(&audit_service),
    ));
    let export_service = Arc::new(ExportService::new(
        assignment_repository,
        report_repository,
        Arc::clone(&audit_service),
    ));
    tracing::info!("Admin services initialized");

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

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(organizations_routes::routes(Arc::clone(&organization_service)))
        .merge(reports_routes::routes(Arc::clone(&report_service)))
        .merge(assignments_routes::routes(Arc::clone(&assignment_service)))
        .merge(operations_routes::routes(Arc::clone(&operation_service)))
        .merge(notifications_routes::routes(
            Arc::clone(&notification_hub),
            config.notifications.keep_alive,
        ))
        .nest(
            "/api/admin",
            Router::new()
                .merge(audit_logs_routes::admin_routes(Arc::clone(&audit_service)))
                .merge(api_keys_routes::admin_routes(api_key_service))
                .merge(export_routes::admin_routes(export_service)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
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
