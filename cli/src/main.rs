// MaxIO
// Copyright 2026 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Bring-up tool for boards with MAX22190 receivers and MAX14915 drivers on a Raspberry Pi.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use anyhow::{Error, Result};
use getopts::{Matches, Options};
use maxio_core::bus::SpiConfig;
use maxio_core::device::{DeviceConfig, ReadTiming};
use maxio_devtest::{blink, Board, Wiring};
use maxio_max14915::Line;
use maxio_rpi::{spi_bus_open, RppalPins, RppalSpiBus};
use std::env;
use std::io;
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default blinking period in milliseconds.
const DEFAULT_BLINK_MS: u64 = 500;

/// Errors caused by the user when invoking this binary (invalid options or arguments).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct UsageError {
    message: String,
}

impl UsageError {
    /// Creates a new usage error with `message`.
    fn new<T: Into<String>>(message: T) -> Self {
        Self { message: message.into() }
    }
}

/// Flattens all causes of an error into a single string.
fn flatten_causes(err: &Error) -> String {
    err.chain().fold(String::new(), |flattened, cause| {
        let flattened = if flattened.is_empty() { flattened } else { flattened + ": " };
        flattened + &format!("{}", cause)
    })
}

/// Consumes and returns the program name from `env::Args`.
///
/// If the program name cannot be obtained, return `default_name` instead.
fn program_name(mut args: env::Args, default_name: &'static str) -> (String, env::Args) {
    let name = match args.next() {
        Some(arg0) => match Path::new(&arg0).file_stem() {
            Some(basename) => match basename.to_str() {
                Some(s) => s.to_owned(),
                None => default_name.to_owned(),
            },
            None => default_name.to_owned(),
        },
        None => default_name.to_owned(),
    };
    (name, args)
}

/// Prints usage information for program `name` with `opts` following the GNU Standards format.
fn help(name: &str, opts: &Options) -> Result<i32> {
    let brief = format!("Usage: {} [options]", name);
    println!("{}", opts.usage(&brief));
    println!("Set RUST_LOG to control logging in more detail.");
    Ok(0)
}

/// Prints version information following the GNU Standards format.
fn version() -> Result<i32> {
    println!("MaxIO devtest {}", env!("CARGO_PKG_VERSION"));
    println!("Copyright 2026 Julio Merino");
    println!("License Apache Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0>");
    Ok(0)
}

/// Parses the value of the `name` option if present.
fn parse_opt<T: FromStr>(matches: &Matches, name: &str) -> Result<Option<T>> {
    match matches.opt_str(name) {
        Some(value) => match value.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                Err(UsageError::new(format!("Invalid value '{}' for --{}", value, name)).into())
            }
        },
        None => Ok(None),
    }
}

/// Installs the global log subscriber.  `RUST_LOG` takes precedence over `verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Version of `main` that returns errors to the caller for reporting.
fn safe_main(name: &str, args: env::Args) -> Result<i32> {
    let args: Vec<String> = args.collect();

    let mut opts = Options::new();
    opts.optopt("", "blink-ms", "period between output toggles", "MS");
    opts.optopt("", "clock-hz", "SPI clock frequency", "HZ");
    opts.optopt("", "count", "number of toggles before exiting (default: until interrupted)", "N");
    opts.optflag("", "dump", "print every register of every chip before blinking");
    opts.optflag("h", "help", "show command-line usage information and exit");
    opts.optflag("", "same-frame-reads", "take read data from the response to the read itself");
    opts.optopt("", "spi-bus", "number of the SPI controller", "N");
    opts.optopt("", "spi-slave", "hardware slave select line of the controller", "N");
    opts.optflag("v", "verbose", "log every device operation");
    opts.optflag("", "verify", "validate the checksum of every response");
    opts.optflag("", "version", "show version information and exit");
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return help(name, &opts);
    }

    if matches.opt_present("version") {
        return version();
    }

    if !matches.free.is_empty() {
        return Err(UsageError::new("Too many arguments").into());
    }

    let defaults = SpiConfig::default();
    let spi = SpiConfig {
        bus: parse_opt(&matches, "spi-bus")?.unwrap_or(defaults.bus),
        slave: parse_opt(&matches, "spi-slave")?.unwrap_or(defaults.slave),
        clock_hz: parse_opt(&matches, "clock-hz")?.unwrap_or(defaults.clock_hz),
        ..defaults
    };
    let blink_ms = parse_opt(&matches, "blink-ms")?.unwrap_or(DEFAULT_BLINK_MS);
    let period = Duration::from_millis(blink_ms);
    let count = parse_opt::<u64>(&matches, "count")?;
    let read_timing = if matches.opt_present("same-frame-reads") {
        ReadTiming::SameFrame
    } else {
        ReadTiming::Pipelined
    };
    let config = DeviceConfig { verify_responses: matches.opt_present("verify"), read_timing };

    init_logging(matches.opt_present("verbose"));
    info!(?spi, ?config, "opening board");

    let bus = Arc::from(Mutex::from(spi.open(spi_bus_open)?));
    let pins = Arc::from(Mutex::from(RppalPins::default()));
    let mut board = Board::new(bus, pins, &Wiring::default(), config)?;

    let result = run(&mut board, matches.opt_present("dump"), period, count);
    let released = board.release();
    let toggles = result?;
    released?;
    info!(toggles, "done");
    Ok(0)
}

/// Reports the state of `board` and blinks its outputs.  Returns the number of toggles.
fn run(
    board: &mut Board<RppalSpiBus, RppalPins>,
    dump: bool,
    period: Duration,
    count: Option<u64>,
) -> Result<u64> {
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        board.report(&mut out)?;
        if dump {
            board.dump(&mut out)?;
        }
    }

    board.configure_outputs()?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let lines = Line::LINE1 | Line::LINE4;
    runtime.block_on(blink(board, lines, period, count, tokio::signal::ctrl_c()))
}

fn main() {
    let (name, args) = program_name(env::args(), "maxio-devtest");
    match safe_main(&name, args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            if let Some(e) = e.downcast_ref::<UsageError>() {
                eprintln!("Usage error: {}", e);
                eprintln!("Type {} --help for more information", name);
                process::exit(2);
            } else if let Some(e) = e.downcast_ref::<getopts::Fail>() {
                eprintln!("Usage error: {}", e);
                eprintln!("Type {} --help for more information", name);
                process::exit(2);
            } else {
                eprintln!("{}: {}", name, flatten_causes(&e));
                process::exit(1);
            }
        }
    }
}
