//! Azur CLI
//!
//! Command-line control for the Cambridge Audio Azur 751BD over RS-232.

use anyhow::{Context, Result};
use azur_core::player::{operation, status, Argument, Player, OPERATIONS};
use azur_core::protocol::{list_ports, ConnectionConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Debug, Parser)]
#[command(name = "azur", version)]
#[command(about = "Control an Azur 751BD Blu-ray player over RS-232", long_about = None)]
struct Cli {
    /// Serial port, tcp://host:port bridge, or "demo" for the simulator
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// JSON connection config (port_name, timeout_ms, extended_timeout_ms)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log protocol traffic
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List local serial ports
    Ports,
    /// List the operations the player understands
    Operations,
    /// Run a named operation, e.g. `run play` or `run set_repeat ALL`
    Run {
        /// Operation name
        operation: String,
        /// Argument for setters and search
        #[arg(allow_negative_numbers = true)]
        argument: Option<String>,
    },
    /// Send a raw 3-character command code
    Raw {
        /// Command code, e.g. QPL
        code: String,
        /// Parameter text
        #[arg(allow_hyphen_values = true)]
        parameters: Option<String>,
    },
}

/// Filter used when `RUST_LOG` is unset; covers the library and this binary
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "azur_core=debug,azur=debug"
    } else {
        "azur_core=warn,azur=warn"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_player(cli: &Cli) -> Result<Player> {
    let config: ConnectionConfig = config::load(cli.config.as_deref(), cli.port.as_deref())?;
    debug!("connection config: {:?}", config);
    Player::open(&config).with_context(|| format!("opening {}", config.port_name))
}

fn print_reply(code: &str, reply: &str) {
    match (reply.is_empty(), status::describe(code, reply)) {
        (true, _) => println!("OK"),
        (false, Some(description)) => println!("{} ({})", reply, description),
        (false, None) => println!("{}", reply),
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Ports => {
            for port in list_ports() {
                match &port.product {
                    Some(product) => println!("{}\t{}", port.name, product),
                    None => println!("{}", port.name),
                }
            }
        }
        Commands::Operations => {
            for op in OPERATIONS {
                let argument = match op.argument {
                    Argument::None => String::new(),
                    other => format!(" <{}>", other.label()),
                };
                println!("{:<26} {}  {}{}", op.name, op.code, op.summary, argument);
            }
        }
        Commands::Run {
            operation: name,
            argument,
        } => {
            let op = operation(name).with_context(|| format!("unknown operation '{}'", name))?;
            debug!("{} resolves to #{}", op.name, op.code);
            let mut player = open_player(&cli)?;
            let reply = player.execute(op, argument.as_deref())?;
            print_reply(op.code, &reply);
        }
        Commands::Raw { code, parameters } => {
            let mut player = open_player(&cli)?;
            let reply = player
                .connection_mut()
                .dispatch(code, parameters.as_deref())?;
            print_reply(code, &reply);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
