use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use njup_grader::config::AppConfig;
use njup_grader::routes;
use njup_grader::runtime::lifetime;
use njup_grader::utils::{json_error_handler, query_error_handler};

// 开发环境带文件与行号，其余环境输出 JSON
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(config.is_development());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .event_format(format);

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }
    guard
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let started = Instant::now();
    dotenv().ok();
    setup_panic!();

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _guard = init_tracing(config);

    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Starting grading service"
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let registry = startup.registry.clone();
    debug!("Startup completed in {} ms", started.elapsed().as_millis());

    let keep_alive = Duration::from_secs(config.server.timeouts.keep_alive);
    let request_timeout = Duration::from_millis(config.server.timeouts.client_request);
    let disconnect_timeout = Duration::from_millis(config.server.timeouts.client_disconnect);
    info!("Using {} HTTP workers", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            // 答案与评分结果不进入中间缓存
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(registry.clone()))
            .configure(routes::configure_course_routes)
            .configure(routes::configure_api_keys_routes)
    })
    .keep_alive(keep_alive)
    .client_request_timeout(request_timeout)
    .client_disconnect_timeout(disconnect_timeout)
    .workers(config.server.workers);

    let server = match config.unix_socket_path() {
        #[cfg(unix)]
        Some(socket_path) => {
            info!("Listening on unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        _ => {
            let bind_address = config.server_bind_address();
            info!("Listening on http://{}", bind_address);
            server.bind(bind_address)?
        }
    };

    tokio::select! {
        res = server.run() => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Grading service stopped");
        }
    }

    Ok(())
}
