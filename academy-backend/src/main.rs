use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{
    http::{header, StatusCode},
    middleware::Logger,
    web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use dotenv::dotenv;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod config;
mod controllers;
mod db;
mod error;
mod middleware;
mod models;
mod notify;
mod rate_limit;
mod validation;

#[cfg(test)]
mod test_support;

use config::Config;
use db::{Database, SubmissionStore};
use notify::ContactNotifier;
use rate_limit::RateLimiter;

pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub config: Config,
    pub rate_limiter: Arc<RateLimiter>,
    pub notifier: Arc<dyn ContactNotifier>,
}

/// Serves the static site's 404 page for paths the site directory doesn't have
async fn not_found_page(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let Some(dir) = state.config.site_dist_dir.as_deref() else {
        return HttpResponse::NotFound().finish();
    };

    match NamedFile::open(Path::new(dir).join("404.html")) {
        Ok(file) => file
            .customize()
            .with_status(StatusCode::NOT_FOUND)
            .respond_to(&req)
            .map_into_boxed_body(),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}

/// Periodically drop rate-limit records whose window has ended
fn spawn_rate_limit_sweeper(
    limiter: Arc<RateLimiter>,
    mut shutdown: tokio::sync::oneshot::Receiver<()>,
) {
    let period = limiter.window().max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = limiter.purge_expired(Instant::now());
                    if removed > 0 {
                        log::debug!("[RATE_LIMIT] Purged {} expired clients, {} tracked", removed, limiter.tracked_clients());
                    }
                }
                _ = &mut shutdown => break,
            }
        }
    });
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(|e| {
        log::error!("Failed to initialize database: {}", e);
        io::Error::other(e.to_string())
    })?;
    match db.count_submissions() {
        Ok(count) => log::info!("Database holds {} contact submissions", count),
        Err(e) => log::warn!("Failed to count contact submissions: {}", e),
    }
    let store: Arc<dyn SubmissionStore> = Arc::new(db);

    log::info!(
        "Rate limiting contact form to {} requests per {}s per client",
        config.rate_limit_max_requests,
        config.rate_limit_window.as_secs()
    );
    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max_requests,
        config.rate_limit_window,
    ));
    let (sweeper_shutdown_tx, sweeper_shutdown_rx) = tokio::sync::oneshot::channel();
    spawn_rate_limit_sweeper(Arc::clone(&rate_limiter), sweeper_shutdown_rx);

    let notifier = notify::build_notifier(&config);
    log::info!("Contact notifications via {} notifier", notifier.name());

    // Serve the prebuilt site only if its directory exists
    let site_dist = match config.site_dist_dir.as_deref() {
        Some(dir) if Path::new(dir).is_dir() => Some(dir.to_string()),
        Some(dir) => {
            log::warn!("Site directory {} not found - static file serving disabled", dir);
            None
        }
        None => {
            log::info!("SITE_DIST_DIR not set - static file serving disabled");
            None
        }
    };

    let state = web::Data::new(AppState {
        store,
        config,
        rate_limiter,
        notifier,
    });

    log::info!("Starting academy backend on port {}", port);
    if let Some(dir) = &site_dist {
        log::info!("Serving site from: {}", dir);
    }

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_header(header::CONTENT_TYPE)
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::contact::config)
            .configure(controllers::robots::config)
            .configure(controllers::analytics::config);

        if let Some(dir) = &site_dist {
            app = app.service(
                Files::new("/", dir.clone())
                    .index_file("index.html")
                    .default_handler(web::to(not_found_page)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await;

    let _ = sweeper_shutdown_tx.send(());
    server
}
