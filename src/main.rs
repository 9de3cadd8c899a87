use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use restaurant_api::application::ports::object_storage::ObjectStorage;
use restaurant_api::bootstrap::app_context::{AppContext, AppServices};
use restaurant_api::bootstrap::config::{Config, StorageBackend};
use restaurant_api::infrastructure::db::repositories::files_repository_sqlx::SqlxFilesRepository;
use restaurant_api::infrastructure::db::repositories::restaurant_repository_sqlx::SqlxRestaurantRepository;
use restaurant_api::presentation::http::route_guard::route_guard;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            restaurant_api::presentation::http::files::list_files,
            restaurant_api::presentation::http::files::upload_file,
            restaurant_api::presentation::http::health::health,
        ),
        components(schemas(
            restaurant_api::presentation::http::files::RestaurantFileResponse,
            restaurant_api::presentation::http::files::StorageUsageResponse,
            restaurant_api::presentation::http::files::UploadRestaurantFileMultipart,
            restaurant_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Files", description = "Restaurant files and storage quota"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        // Production requires FRONTEND_URL (enforced in Config), deny everything otherwise
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
            .allow_methods(methods)
            .allow_headers(headers),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "restaurant_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        backend = ?cfg.storage_backend,
        production = cfg.is_production,
        "Starting restaurant files API"
    );

    // Database
    let pool = restaurant_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    restaurant_api::infrastructure::db::migrate(&pool).await?;

    let object_storage: Arc<dyn ObjectStorage> = match cfg.storage_backend {
        StorageBackend::Filesystem => {
            if let Err(e) = tokio::fs::create_dir_all(&cfg.storage_root).await {
                tracing::warn!(error = ?e, dir = %cfg.storage_root, "Failed to create storage root");
            }
            Arc::new(restaurant_api::infrastructure::storage::fs::FsObjectStorage::new(
                &cfg.storage_root,
                cfg.public_base_url.clone(),
            ))
        }
        StorageBackend::S3 => Arc::new(
            restaurant_api::infrastructure::storage::s3::S3ObjectStorage::new(&cfg).await?,
        ),
    };

    let services = AppServices::new(
        Arc::new(SqlxRestaurantRepository::new(pool.clone())),
        Arc::new(SqlxFilesRepository::new(pool.clone())),
        object_storage,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let mut app = Router::new()
        .nest(
            "/api",
            restaurant_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api",
            restaurant_api::presentation::http::files::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));

    if cfg.storage_backend == StorageBackend::Filesystem {
        app = app.nest_service("/public/files", ServeDir::new(&cfg.storage_root));
    }
    if let Some(web_root) = &cfg.web_root {
        app = app.fallback_service(ServeDir::new(web_root));
    }

    let app = app
        .layer(axum::middleware::from_fn_with_state(ctx.clone(), route_guard))
        .layer(cors_layer(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?e, "shutdown_signal_failed");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
