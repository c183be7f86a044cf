use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use crawl_monitor_core::{MonitorState, MonitorViewModel, Outcome};
use crawl_monitor_engine::{ConfigStore, JobLifecycleMonitor, ReqwestJobApi};
use monitor_logging::{monitor_debug, monitor_warn};
use url::Url;

use super::cli::Cli;
use super::persistence::RonConfigStore;
use super::{logging, render};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.level());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    runtime.block_on(run_session(cli))
}

async fn run_session(cli: Cli) -> anyhow::Result<()> {
    let server = Url::parse(&cli.server).with_context(|| format!("invalid --server {}", cli.server))?;
    let store = RonConfigStore::new(cli.config.clone());
    let input = cli.job_input(store.load());

    let api = ReqwestJobApi::new(cli.client_settings()).context("building http client")?;
    let mut monitor =
        JobLifecycleMonitor::new(Arc::new(api), cli.monitor_settings()).with_config_store(store);
    monitor.subscribe(|state: &MonitorState| {
        monitor_debug!("Monitor is now {:?}", state.phase());
    });

    let job = match monitor.start(input).await {
        Ok(job) => job,
        Err(err) => {
            print_view(&monitor.view(), &server);
            return Err(err).context("could not start crawl");
        }
    };
    println!("Crawl started: {job}");
    print_view(&monitor.view(), &server);

    loop {
        tokio::select! {
            update = monitor.next_update() => {
                if update.is_none() {
                    break;
                }
                print_view(&monitor.view(), &server);
            }
            _ = tokio::signal::ctrl_c() => {
                monitor_warn!("Interrupted; abandoning job {}", job);
                monitor.cancel();
                println!("Stopped following {job}; the crawl keeps running on the server.");
                return Ok(());
            }
        }
    }

    match monitor.view().outcome {
        Some(Outcome::Completed) => Ok(()),
        Some(Outcome::Failed) => bail!("crawl {job} failed"),
        None => bail!("crawl {job} stopped without a final status"),
    }
}

fn print_view(view: &MonitorViewModel, server: &Url) {
    for line in render::render(view, server) {
        println!("{line}");
    }
}
