use std::sync::Arc;

use ssr_utility::build::BuildPlan;
use ssr_utility::config::{AppState, Config};
use ssr_utility::observers::{self, ErrorObservers, PolicyTable};
use ssr_utility::render::ShellRenderer;
use ssr_utility::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arg = std::env::args().nth(1);

    // `build-plan` prints the bundler entry wiring and exits
    if arg.as_deref() == Some("build-plan") {
        println!("{}", BuildPlan::standard().to_json()?);
        return Ok(());
    }

    let config_path = arg.unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;
    let observers = observers::install(PolicyTable::default());

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::write_info(&format!("[CONFIG] Using {workers} worker threads"));
    } else {
        logger::write_info("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, observers))
}

async fn async_main(
    cfg: Config,
    observers: &'static ErrorObservers,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // A missing manifest is a build problem: refuse to start
    let state = Arc::new(AppState::new(
        &cfg,
        Arc::new(ShellRenderer::default()),
        observers.clone(),
    )?);

    let listener = match server::create_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            // Exits here when the port is already taken
            observers.uncaught(&e);
            return Err(e.into());
        }
    };

    logger::log_server_start(&addr, &cfg);
    server::run(listener, state).await?;
    Ok(())
}
