use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use rolling_stats::Stats;

use smoothvolt::config::{Period, PipelineConfig};
use smoothvolt::output::{Formatter, OutputFormat, create_formatter};
use smoothvolt::pipeline::{Pipeline, PipelineHandle};
use smoothvolt::sampling::{Calibrator, LinearCalibrator, ReplaySource, SampleSource};

#[derive(Parser, Debug)]
#[command(name = "smoothvolt")]
#[command(about = "Sample an ADC-style source and emit moving-average millivolt readings", long_about = None)]
struct Args {
    /// Replay raw codes from a text file instead of the synthetic source
    #[arg(long)]
    file: Option<PathBuf>,

    /// Load pipeline configuration from a TOML file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Sampler period (e.g. "100ms", "10hz")
    #[arg(long)]
    period: Option<Period>,

    /// Filter period (defaults to the sampler period's default, not tied to it)
    #[arg(long)]
    filter_period: Option<Period>,

    /// Moving average window size
    #[arg(short = 'w', long)]
    window: Option<usize>,

    /// Ring capacity in slots
    #[arg(long)]
    capacity: Option<usize>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip calibration and store raw codes directly
    #[arg(long)]
    uncalibrated: bool,

    /// Calibrated full-scale input in millivolts
    #[arg(long, default_value = "3300")]
    full_scale_mv: i32,

    /// Stop after this many seconds (runs until interrupted if omitted)
    #[arg(short = 'd', long)]
    duration: Option<f64>,

    /// Print summary statistics of the filtered output at exit
    #[arg(long)]
    stats: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(period) = args.period {
        config.sampler.period = period;
    }
    if let Some(period) = args.filter_period {
        config.filter.period = period;
    }
    if let Some(window) = args.window {
        config.filter.window_size = window;
    }
    if let Some(capacity) = args.capacity {
        config.ring.capacity = capacity;
    }

    let source = make_source(&args)?;
    let calibrator: Option<Box<dyn Calibrator>> = if args.uncalibrated {
        None
    } else {
        Some(Box::new(LinearCalibrator::new(args.full_scale_mv)))
    };

    println!("=== smoothvolt ===");
    println!("Ring capacity: {} slots", config.ring.capacity);
    println!("Sampler period: {}", config.sampler.period);
    println!(
        "Filter: window {} samples, period {}",
        config.filter.window_size, config.filter.period
    );
    println!(
        "Calibration: {}",
        if args.uncalibrated {
            "disabled (raw codes)".to_string()
        } else {
            format!("linear, {} mV full scale", args.full_scale_mv)
        }
    );
    println!();

    let handle = Pipeline::start(&config, source, calibrator)?;
    let formatter = create_formatter(args.format, args.verbose > 0);

    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let stats = run_output_loop(&handle, formatter.as_ref(), args.duration);
    handle.shutdown();

    if args.stats {
        print_stats(&stats);
    }

    Ok(())
}

fn make_source(args: &Args) -> anyhow::Result<Box<dyn SampleSource>> {
    if let Some(path) = &args.file {
        return Ok(Box::new(ReplaySource::from_file(path)?));
    }

    #[cfg(feature = "simulation")]
    {
        use smoothvolt::simulation::{SyntheticConfig, SyntheticSource};
        Ok(Box::new(SyntheticSource::new(SyntheticConfig::default())))
    }
    #[cfg(not(feature = "simulation"))]
    {
        anyhow::bail!(
            "no --file given and this build has no synthetic source; \
             rebuild with --features simulation or pass --file"
        )
    }
}

fn run_output_loop(
    handle: &PipelineHandle,
    formatter: &dyn Formatter,
    duration_secs: Option<f64>,
) -> Stats<f32> {
    let mut stats = Stats::new();
    let deadline = duration_secs.map(|secs| Instant::now() + Duration::from_secs_f64(secs));

    loop {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }

        match handle.filtered().recv_timeout(Duration::from_millis(100)) {
            Ok(reading) => {
                stats.update(reading.millivolts as f32);
                println!("{}", formatter.format(&reading));
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Pipeline stopped");
                break;
            }
        }
    }

    stats
}

fn print_stats(stats: &Stats<f32>) {
    if stats.count == 0 {
        println!("No filtered readings produced");
        return;
    }
    println!();
    println!("Filtered output over {} readings:", stats.count);
    println!(
        "  mean {:.1} mV, std dev {:.1} mV, min {:.0} mV, max {:.0} mV",
        stats.mean, stats.std_dev, stats.min, stats.max
    );
}
