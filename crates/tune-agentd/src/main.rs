mod config;
mod services;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use taskvisor::Subscribe;
use tokio::net::TcpListener;
use tracing::info;

use tune_api::{EngineAdapter, HttpApi};
use tune_core::{Fleet, HttpControllerClient, SyncEngine, SyncSupervisor};
use tune_model::INITIAL_VERSION;
use tune_observe::{LoggerTimeZone, SyncEventLogger, init_local_offset, init_logger};
use tune_prometheus::PrometheusMetrics;

use crate::config::{AgentConfig, Cli};
use crate::services::{MockService, UserService};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AgentConfig::load(&cli)?;
    if cfg.logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 1) logger
    let levels = Arc::new(init_logger(&cfg.logger)?);
    info!(
        controller = %cfg.controller.url,
        system = %cfg.controller.system_name,
        version = INITIAL_VERSION,
        "logger initialized"
    );

    // 2) subscribers
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(SyncEventLogger)];

    // 3) services + fleet
    let mock = MockService::default();
    let user = UserService::default();
    let fleet = Fleet::builder()
        .register(mock.table()?)
        .register(user.table()?)
        .build();

    // 4) engine
    let client = Arc::new(HttpControllerClient::new(&cfg.controller)?);
    let metrics = PrometheusMetrics::new()?;
    let engine = Arc::new(
        SyncEngine::new(cfg.controller.clone(), fleet, client, levels)
            .with_metrics(Arc::new(metrics.clone())),
    );

    // 5) http: serving starts before the controller is contacted
    let api = HttpApi::new(Arc::new(
        EngineAdapter::new(Arc::clone(&engine)).with_metrics(metrics),
    ))
    .status_alias("/user/config/status");
    let app = api.router().merge(mock.routes()).merge(user.routes());

    let addr = cfg.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "http listener ready");
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    // 6) supervisor: startup pass, then both loops, in the background
    let _supervisor = SyncSupervisor::start(engine, subscribers).await?;

    server.await.context("http server task failed")??;
    Ok(())
}
