//! Jetson register access CLI.
//!
//! This binary bundles the example programs built on `jetmmio-core`. It provides:
//! 1. **Raw access:** Read or write any field given base, offset, bit and width.
//! 2. **Named access:** Read or write a field from the built-in tables or the config file.
//! 3. **Blink:** Toggle an output pin on a fixed interval.
//! 4. **Poll:** Sample and print the levels of several input pins.
//! 5. **Keys:** Forward input-pin transitions as key events on stdout.

mod commands;
mod error;
mod sink;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jetmmio_core::config::Config;
use jetmmio_core::mem::{DevMem, SimulatedMemory};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "jetmmio",
    author,
    version,
    about = "Read and write Jetson peripheral register fields through /dev/mem",
    long_about = "Read and write Jetson GPIO, pinmux and pad-control register fields from user space.\n\nMost commands need root (or CAP_SYS_RAWIO) for /dev/mem; --simulate runs against in-process memory instead.\n\nExamples:\n  jetmmio get 0x6000d000 0x30 4 1\n  jetmmio field gpio:PB4:OUT 1\n  jetmmio blink --pin PB4 --interval-ms 250\n  jetmmio poll --pins PB4 PB5 --iterations 10\n  jetmmio --config keys.json keys"
)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use simulated memory instead of the physical-memory device.
    #[arg(long, global = true)]
    simulate: bool,

    /// Physical-memory device to map (overrides the config file).
    #[arg(long, global = true)]
    dev_mem: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a field: BASE OFFSET BASE_BIT WIDTH.
    Get {
        /// Physical base address of the window.
        #[arg(value_parser = parse_u32)]
        base: u32,
        /// Byte offset of the register from BASE.
        #[arg(value_parser = parse_u32)]
        offset: u32,
        /// Least significant bit of the field.
        #[arg(value_parser = parse_u32)]
        base_bit: u32,
        /// Field width in bits.
        #[arg(value_parser = parse_u32)]
        width: u32,
    },

    /// Write a field: BASE OFFSET VALUE BASE_BIT WIDTH.
    Set {
        /// Physical base address of the window.
        #[arg(value_parser = parse_u32)]
        base: u32,
        /// Byte offset of the register from BASE.
        #[arg(value_parser = parse_u32)]
        offset: u32,
        /// New field value (truncated to WIDTH bits).
        #[arg(value_parser = parse_u32)]
        value: u32,
        /// Least significant bit of the field.
        #[arg(value_parser = parse_u32)]
        base_bit: u32,
        /// Field width in bits.
        #[arg(value_parser = parse_u32)]
        width: u32,
    },

    /// Read, or write when VALUE is given, a named field (e.g. gpio:PB4:OUT, pinmux:SDMMC1_CLK:PM).
    Field {
        /// Field name from the config file or the built-in tables.
        name: String,
        /// New value.
        #[arg(value_parser = parse_u32)]
        value: Option<u32>,
    },

    /// Toggle an output pin.
    Blink {
        /// Pin to drive, e.g. PB4.
        #[arg(short, long)]
        pin: String,
        /// Half-period in milliseconds.
        #[arg(short, long, default_value_t = 500)]
        interval_ms: u64,
        /// Number of toggles (default: forever).
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Print the levels of input pins.
    Poll {
        /// Pins to sample, e.g. PB4 PB5.
        #[arg(short, long, num_args = 1.., required = true)]
        pins: Vec<String>,
        /// Sample interval in milliseconds (default: config poll interval).
        #[arg(short, long)]
        interval_ms: Option<u64>,
        /// Number of samples (default: forever).
        #[arg(short = 'n', long)]
        iterations: Option<u64>,
    },

    /// Forward configured pin transitions as JSON key events on stdout.
    Keys {
        /// Number of samples (default: forever).
        #[arg(short = 'n', long)]
        iterations: Option<u64>,
    },
}

/// Parses decimal or `0x`-prefixed hexadecimal.
fn parse_u32(s: &str) -> Result<u32, String> {
    let s = s.replace('_', "");
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number {s:?}: {e}"))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Loads configuration, picks the memory backend and runs the command.
fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(path) = cli.dev_mem {
        config.device.path = path;
    }
    config.device.simulate |= cli.simulate;

    if config.device.simulate {
        tracing::info!("using simulated memory");
        commands::run(&cli.command, &config, &SimulatedMemory::new())
    } else {
        commands::run(&cli.command, &config, &DevMem::new(&config.device.path))
    }
}
