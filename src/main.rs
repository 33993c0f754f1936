use slow_responder::config::Config;
use slow_responder::handler::RequestHandler;
use slow_responder::{logger, Error, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load().map_err(Error::from)?;
    logger::init(&cfg.logging).map_err(Error::Logger)?;

    // Create Tokio runtime, sizing the worker pool from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let handler = RequestHandler::default();

    let server = Server::bind(addr, handler, cfg.clone())?;
    logger::log_server_start(&server.local_addr()?, &cfg, handler.delay());

    server.run().await;
    Ok(())
}
