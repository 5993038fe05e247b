use std::sync::Arc;
use std::time::Duration;

use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::identity::FirebaseIdentityProvider;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use account_service::session::service::SessionService;
use auth::FirebaseVerifier;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        persistent_store = config.database.url.is_some(),
        "Configuration loaded"
    );

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(Arc::new(
                PostgresAccountRepository::new(pg_pool),
            )))
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            Arc::new(AccountService::new(Arc::new(
                InMemoryAccountRepository::new(),
            )))
        }
    };

    let token_issuer = Arc::new(TokenIssuer::new(config.jwt.token_settings()?)?);

    let firebase_settings = config.firebase.settings()?;
    tracing::info!(
        project_id = %firebase_settings.project_id,
        "Federated identity provider configured"
    );
    let identity_provider = Arc::new(FirebaseIdentityProvider::new(FirebaseVerifier::new(
        firebase_settings,
    )?));

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&account_service),
        identity_provider,
        Arc::clone(&token_issuer),
    ));

    let state = AppState {
        session_service,
        account_service,
        token_issuer,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
