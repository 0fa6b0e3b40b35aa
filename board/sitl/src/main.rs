use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ahrs::config::DEFAULT_SAMPLE_COUNT;
use ahrs::{AhrsConfig, CsvLogger, Engine, SystemClock, ThreadDelay};
use anyhow::Context;
use clap::Parser;
use log::{error, info};
use sim::SimulatedImu;

mod sim;

/// Seconds the simulated vehicle stays still after calibration
const STILL_SECONDS: u64 = 2;

#[derive(Parser, Debug)]
#[command(name = "sitl")]
#[command(about = "Attitude and motion estimation against a simulated IMU", long_about = None)]
struct Args {
    /// Samples per calibration session
    #[arg(value_name = "SAMPLE_COUNT", default_value_t = DEFAULT_SAMPLE_COUNT)]
    sample_count: usize,

    /// Print phase transitions and calibration samples (True/False)
    #[arg(
        value_name = "VERBOSE",
        default_value = "False",
        value_parser = parse_verbose,
        action = clap::ArgAction::Set
    )]
    verbose: bool,

    /// Tabular log, truncated at startup
    #[arg(long, default_value = "adcs_log.csv")]
    log: PathBuf,

    /// Stop after this many ticks (runs until interrupted otherwise)
    #[arg(long)]
    ticks: Option<u64>,

    /// Polling rate in Hz
    #[arg(long, default_value_t = 50)]
    rate: u32,
}

fn parse_verbose(value: &str) -> Result<bool, String> {
    match value {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => Err(format!("expected True or False, got {other}")),
    }
}

type SitlEngine = Engine<SimulatedImu, SystemClock>;

enum State {
    Initializing,
    Running(Box<SitlEngine>, CsvLogger<BufWriter<File>>),
    Stopping { skipped: u64 },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    anyhow::ensure!(args.rate > 0, "--rate must be at least 1 Hz");

    let minimum_elapsed_duration = Duration::from_secs_f64(1.0 / f64::from(args.rate));
    let mut last_update_time = Instant::now();
    let mut state = State::Initializing;
    let mut update_cycle_count: u64 = 0;

    loop {
        state = match state {
            State::Initializing => {
                info!(
                    "Initializing with {} samples per channel, logging to {}",
                    args.sample_count,
                    args.log.display()
                );
                let config = AhrsConfig::new(args.sample_count, args.verbose);
                let still = args.sample_count as u64 + STILL_SECONDS * u64::from(args.rate);
                let imu = SimulatedImu::new(args.rate, still);
                let engine = Engine::new(imu, SystemClock::new(), &mut ThreadDelay, config)
                    .context("engine startup failed")?;
                let log = CsvLogger::create(&args.log)
                    .with_context(|| format!("cannot open {}", args.log.display()))?;
                info!("Running at {} Hz", args.rate);
                last_update_time = Instant::now();
                State::Running(Box::new(engine), log)
            }
            State::Running(mut engine, mut log) => {
                let elapsed = last_update_time.elapsed();
                if elapsed < minimum_elapsed_duration {
                    std::thread::sleep(minimum_elapsed_duration - elapsed);
                }
                last_update_time = Instant::now();

                let report = match engine.tick(&mut log) {
                    Ok(report) => report,
                    Err(e) => {
                        error!("Tick {} failed: {}", update_cycle_count + 1, e);
                        return Err(e).context("estimation loop stopped");
                    }
                };
                update_cycle_count += 1;

                if update_cycle_count % u64::from(args.rate) == 0 {
                    let o = report.orientation.fused;
                    info!(
                        "t={:.2}s roll {:.1} pitch {:.1} yaw {:.1} vel {:?} pos {:?}",
                        report.timestamp,
                        o.roll,
                        o.pitch,
                        o.yaw,
                        report.velocity.as_slice(),
                        report.position.as_slice()
                    );
                    if let Some(north) = engine.north_reference() {
                        info!(
                            "North: roll {:.1} pitch {:.1} yaw {:.1}",
                            north.roll, north.pitch, north.yaw
                        );
                    }
                }

                match args.ticks {
                    Some(limit) if update_cycle_count >= limit => State::Stopping {
                        skipped: engine.state().skipped_ticks,
                    },
                    _ => State::Running(engine, log),
                }
            }
            State::Stopping { skipped } => {
                info!(
                    "Stopping after {} ticks ({} without integration)",
                    update_cycle_count, skipped
                );
                break;
            }
        };
    }
    Ok(())
}
