use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_dashboard::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The web server for the Finanzas dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the transactions backend, e.g. "http://localhost:8000".
    #[arg(long, env = "BACKEND_URL")]
    backend_url: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, used for default dates and
    /// for displaying transaction dates.
    #[arg(long, env = "TIMEZONE", default_value = "America/Santiago")]
    timezone: String,

    /// Where to send users whose session the backend rejected.
    #[arg(long, env = "LOG_IN_URL", default_value = "/login")]
    log_in_url: String,

    /// File path to write debug logs to.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: String,

    /// Log the headers and body of every request and response.
    #[arg(long)]
    log_requests: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not open log file {}: {error}", args.log_path);
        return ExitCode::FAILURE;
    }

    let app_state = match AppState::new(&args.backend_url, &args.timezone, &args.log_in_url) {
        Ok(app_state) => app_state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let mut router = add_tracing_layer(build_router(app_state));

    if args.log_requests {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {addr}, using the backend at {}",
        args.backend_url
    );

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_path: &str) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
