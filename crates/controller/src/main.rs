//! Traffic Signal Controller - Main Entry Point
//!
//! Usage: `traffic-controller [--config <path>]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use controller::{
    init_logging, shutdown_signal, ControllerConfig, JsonLinesSink, LogSink, TrafficController,
};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = parse_args()?;
    let config = ControllerConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_logging(&config.logging)?;

    info!("=== Traffic Signal Controller v{} ===", env!("CARGO_PKG_VERSION"));

    let mut controller = TrafficController::from_config(&config).context("building lanes")?;
    if config.output.log {
        controller.add_sink(Box::new(LogSink));
    }
    if config.output.json_lines {
        controller.add_sink(Box::new(JsonLinesSink::new(std::io::stdout())));
    }

    if !config.timing.realtime {
        let duration = config
            .timing
            .run_for()
            .context("timing.run_for_secs is required when timing.realtime = false")?;
        controller.run_simulated(duration)?;
        return Ok(());
    }

    controller.run(shutdown_signal(config.timing.run_for())).await?;
    Ok(())
}

fn parse_args() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(config)
}
