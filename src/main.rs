use std::sync::Arc;

use clap::Parser;

mod cli;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;
mod templates;

use error::StartupError;

fn main() {
    if let Err(e) = run() {
        logger::log_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<(), StartupError> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load_from(&cli.config, &cli.overrides())?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr().map_err(StartupError::Address)?;
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

    let templates = templates::TemplateEngine::new(&cfg.templates.dir, cfg.server.debug);
    let state = Arc::new(config::AppState::new(&cfg, templates));
    server::signal::start_signal_handler(Arc::clone(&state)).map_err(StartupError::Signals)?;

    logger::log_server_start(&addr, &cfg);
    server::start_server_loop(listener, state).await;
    logger::log_info("Server stopped");
    Ok(())
}
