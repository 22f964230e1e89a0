//! Marine Gateway - Main Entry Point
//!
//! Runs the default gateway graph on a host, replaying a candump capture in
//! place of a live NMEA 2000 bus.
//!
//! ```text
//! marine-gateway [config.toml] [candump.log]
//! ```

use anyhow::{bail, Context};
use crossbeam_channel::bounded;
use marine_gateway::{
    config::GatewayConfig,
    drivers::{CandumpReplay, SerialPort, SerialReplay},
    model::SourceInput,
    gateway::{Gateway, GatewayIo},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config_path = args.next();
    let replay_arg = args.next();

    // The log filter lives in the config file, so it is read before any
    // subscriber exists.
    let config = match config_path.as_deref() {
        Some(path) => GatewayConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GatewayConfig::load_or_default(None),
    };

    let _log_guard = init_logging(&config)?;
    tracing::info!("Starting marine gateway");

    let replay_path = replay_arg
        .or_else(|| config.bus.replay_file.clone())
        .context("no CAN source: pass a candump capture or set bus.replay_file")?;
    let can = CandumpReplay::open(&replay_path)
        .with_context(|| format!("opening replay {}", replay_path.display()))?;

    let data_log: Box<dyn Write> = match &config.log.data_log {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    let mut serial: Vec<(SourceInput, Box<dyn SerialPort>)> = Vec::new();
    for (input, line) in config.serial.enabled_lines() {
        let Some(path) = &line.replay_file else {
            tracing::warn!(
                "Serial line {} ({} baud) has no replay_file and no serial driver exists on this host",
                input,
                line.baud_rate
            );
            continue;
        };
        let port = SerialReplay::open(path, line.baud_rate, config.scheduler.tick_rate_hz)
            .with_context(|| format!("opening {} replay", input))?;
        serial.push((input, Box::new(port)));
    }

    let (bridge_tx, bridge_rx) = bounded::<String>(config.bridge.queue_depth);
    let bridge_thread = std::thread::Builder::new()
        .name("bridge".to_string())
        .spawn(move || {
            let mut forwarded = 0u64;
            for message in bridge_rx.iter() {
                tracing::trace!(target: "marine_gateway::bridge", "{}", message);
                forwarded += 1;
            }
            forwarded
        })
        .context("spawning bridge thread")?;

    let running = Arc::new(AtomicBool::new(true));
    let io = GatewayIo {
        can: Box::new(can),
        serial,
        adc: None,
        imu: None,
        barometer: None,
        data_log,
        bridge: bridge_tx,
    };
    let Gateway {
        mut scheduler,
        nodes,
        dashboard,
    } = Gateway::build(&config, io, running.clone())?;
    tracing::debug!("Gateway nodes: {:?}", nodes);

    scheduler.run(running);
    scheduler.log_stats();

    for (quantity, reading) in dashboard.borrow().iter() {
        tracing::info!(
            "{} = {:.4} {} ({})",
            quantity.path(),
            reading.value,
            quantity.unit(),
            reading.source.label()
        );
    }

    // Dropping the scheduler drops the bridge sender and ends the drain loop.
    drop(scheduler);
    match bridge_thread.join() {
        Ok(forwarded) => tracing::info!("Bridge forwarded {} messages", forwarded),
        Err(_) => bail!("bridge thread panicked"),
    }

    Ok(())
}

/// Console logging always, plus a daily-rotated file when `log.directory` is
/// set. The returned guard flushes the file writer on drop.
fn init_logging(config: &GatewayConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, &config.log.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
