use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use camino::Utf8PathBuf;
use diesel_async::{
    AsyncPgConnection,
    async_connection_wrapper::AsyncConnectionWrapper,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{Object, Pool},
    },
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use g2p_core::model::curator::NewCurator;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use util::DevContainer;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{self, model::Write},
    ontology::OlsClient,
};

mod api;
pub mod auth;
pub mod util;

/// # Errors
pub async fn serve(mut config: Config, log_dir: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    initialize_logging(log_dir);

    config
        .read_secrets()
        .context("failed to read secrets directory")?;
    let app_addr = config.app_address();

    let app_state = AppState::new(config)
        .await
        .context("failed to initialize app state")?;
    tracing::info!("initialized app state");

    let app = app(app_state.clone());

    let listener = TcpListener::bind(&app_addr)
        .await
        .context(format!("failed to listen on {app_addr}"))?;
    tracing::info!("g2p listening on {app_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(app_state))
        .await
        .context("failed to serve app")?;

    Ok(())
}

fn initialize_logging(log_dir: Option<Utf8PathBuf>) {
    use tracing::Level;
    use tracing_subscriber::{filter::Targets, prelude::*};

    let log_layer = tracing_subscriber::fmt::layer();

    match log_dir {
        None => {
            let dev_test_log_filter = Targets::new()
                .with_target("g2p_backend", Level::DEBUG)
                .with_target("tower_http", Level::TRACE);
            let log_layer = log_layer.pretty().with_filter(dev_test_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
        Some(path) => {
            let log_writer = tracing_appender::rolling::daily(path, "g2p.log");
            let prod_log_filter = Targets::new()
                .with_target("g2p_backend", Level::INFO)
                .with_target("tower_http", Level::INFO);
            let log_layer = log_layer
                .json()
                .with_writer(log_writer)
                .with_filter(prod_log_filter);

            tracing_subscriber::registry().with(log_layer).init();
        }
    }
}

#[derive(Clone)]
enum AppState {
    Dev {
        db_pool: Pool<AsyncPgConnection>,
        _pg_container: Arc<DevContainer>,
        user: auth::User,
        ontology: OlsClient,
    },
    Prod {
        db_pool: Pool<AsyncPgConnection>,
        ontology: OlsClient,
        config: Arc<Config>,
    },
}

impl AppState {
    async fn new(config: Config) -> anyhow::Result<Self> {
        let ontology = OlsClient::new(
            reqwest::Client::new(),
            config.ols_url().clone(),
            config.omim_url().clone(),
            config.omim_api_key().map(str::to_string),
        );
        let seed_data = config.seed_data()?;

        let state = if config.is_dev() {
            let pg_container = DevContainer::new(&format!("g2p-dev-{}", Uuid::now_v7()), false)
                .await
                .context("failed to start postgres container instance")?;

            let db_pool = db_pool(&pg_container.db_url().await?)?;
            initialize_db(&db_pool, seed_data).await?;

            let mut db_conn = db_pool.get().await?;
            let created = NewCurator {
                username: "dev".to_string(),
                email: "dev@example.com".to_string(),
                panels: vec![],
            }
            .write(&mut db_conn)
            .await
            .context("failed to create dev curator")?;
            tracing::info!(api_key = %created.api_key, "created dev curator");

            Self::Dev {
                db_pool,
                _pg_container: Arc::new(pg_container),
                user: auth::User(created.curator),
                ontology,
            }
        } else {
            let db_pool = db_pool(&config.db_url())?;
            initialize_db(&db_pool, seed_data).await?;

            Self::Prod {
                db_pool,
                ontology,
                config: Arc::new(config),
            }
        };

        Ok(state)
    }

    async fn db_conn(&self) -> db::error::Result<Object<AsyncPgConnection>> {
        use AppState::{Dev, Prod};

        match self {
            Dev { db_pool, .. } | Prod { db_pool, .. } => Ok(db_pool.get().await?),
        }
    }

    fn ontology(&self) -> &OlsClient {
        use AppState::{Dev, Prod};

        match self {
            Dev { ontology, .. } | Prod { ontology, .. } => ontology,
        }
    }
}

fn db_pool(db_url: &str) -> anyhow::Result<Pool<AsyncPgConnection>> {
    let db_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);

    Ok(Pool::builder(db_config).build()?)
}

async fn initialize_db(
    db_pool: &Pool<AsyncPgConnection>,
    seed_data: db::seed_data::SeedData,
) -> anyhow::Result<()> {
    run_migrations(db_pool.get().await?)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("ran database migrations");

    let mut db_conn = db_pool.get().await?;
    seed_data
        .write(&mut db_conn)
        .await
        .context("failed to insert seed data")?;
    tracing::info!("inserted seed data");

    Ok(())
}

pub(crate) async fn run_migrations(db_conn: Object<AsyncPgConnection>) -> anyhow::Result<()> {
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../db/migrations");

    let mut wrapper: AsyncConnectionWrapper<Object<AsyncPgConnection>> =
        AsyncConnectionWrapper::from(db_conn);

    tokio::task::spawn_blocking(move || {
        wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| anyhow::anyhow!(err))
    })
    .await??;

    Ok(())
}

fn app(app_state: AppState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .route("/health", get(async || ()))
        .with_state(app_state)
}

async fn shutdown_signal(app_state: AppState) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => drop(app_state),
        () = terminate => drop(app_state),
    }
}
