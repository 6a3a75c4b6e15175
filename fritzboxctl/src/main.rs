#[macro_use]
extern crate tracing;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fritzbox::{HttpTransport, Session};
use tracing_subscriber::prelude::*;

mod list;
mod parser;
mod read;
mod switch;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    #[clap(short, long, action)]
    verbose: bool,
    #[clap(long, env = "FRITZ_HOST", default_value = "fritz.box")]
    host: String,
    #[clap(short, long, env = "FRITZ_USER")]
    user: String,
    #[clap(short, long, env = "FRITZ_PASSWORD", hide_env_values = true)]
    password: String,
    #[clap(long, env = "FRITZ_TIMEOUT", default_value_t = 2, help = "request timeout in seconds")]
    timeout: u64,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lists all devices or shows the details of one device.
    List {
        #[clap(long, help = "The device name or identifier (ain) of the device to show.")]
        device: Option<String>,
        #[clap(
            long,
            requires = "device",
            value_parser = parser::parse_kinds,
            help = "Comma separated list of the detail categories to show. Possible values: temperature, voltage, power, energy"
        )]
        kinds: Option<parser::StatKinds>,
        #[clap(short, long)]
        limit: Option<usize>,
    },
    /// Switches a socket or queries its switch state.
    Switch {
        device: String,
        #[clap(value_enum)]
        action: switch::SwitchAction,
    },
    /// Reads the current sensor values of a device.
    Read { device: String },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        "info,fritzbox=trace,reqwest=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().parse_lossy(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let transport = HttpTransport::with_timeout(Duration::from_secs(args.timeout))?;
    let mut session = Session::with_transport(transport);
    session.connect(&args.host, &args.user, &args.password)?;

    let result = match &args.command {
        Command::List {
            device,
            kinds,
            limit,
        } => list::list(&session, device.as_deref(), kinds.as_ref(), *limit),
        Command::Switch { device, action } => switch::switch(&session, device, *action),
        Command::Read { device } => read::read(&session, device),
    };

    if let Err(err) = session.close() {
        warn!("logout failed: {err}");
    }
    result
}
