//! # btprint CLI
//!
//! Command-line interface for the Bluetooth printer bridge.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP call surface
//! btprint serve --listen 127.0.0.1:8420
//!
//! # List paired devices
//! btprint devices
//!
//! # Print a line at size 3
//! btprint print --address 00:11:22:33:44:55 --size 3 "Hello"
//!
//! # Send raw bytes (a newline is prepended)
//! btprint write --address 00:11:22:33:44:55 27 100 3
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use btprint::{
    PrinterError,
    config::{BridgeConfig, DEFAULT_LISTEN_ADDR},
    dispatch::Bridge,
    host::LinuxHost,
    notify::{LogNotifier, NotificationLog, Notifier},
    protocol::{
        commands,
        text::{self, DEFAULT_SIZE_INDEX},
    },
    server::{self, AppState},
    session::PrinterSession,
    transport::{BluetoothAdapter, BluezAdapter, DEFAULT_RFCOMM_CHANNEL},
};

/// btprint - Bluetooth serial bridge for thermal receipt printers
#[derive(Parser, Debug)]
#[command(name = "btprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RFCOMM channel the printer serves SPP on
    #[arg(long, global = true, default_value_t = DEFAULT_RFCOMM_CHANNEL)]
    channel: u8,

    /// Seconds to wait for a connection before giving up
    #[arg(long, global = true, default_value = "10")]
    connect_timeout: u64,

    /// Seconds a single socket write may block
    #[arg(long, global = true, default_value = "5")]
    write_timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the call surface over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,
    },

    /// List paired devices as name#address
    Devices,

    /// Report whether the Bluetooth adapter is powered on
    Status,

    /// Print one block of text
    Print {
        /// Printer Bluetooth address
        #[arg(long)]
        address: String,

        /// Size preset 0-5
        #[arg(long, default_value_t = DEFAULT_SIZE_INDEX)]
        size: u8,

        /// Text to print
        text: String,
    },

    /// Write raw byte values
    Write {
        /// Printer Bluetooth address
        #[arg(long)]
        address: String,

        /// Byte values 0-255
        #[arg(required = true)]
        bytes: Vec<u8>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PrinterError> {
    let cli = Cli::parse();

    let mut config = BridgeConfig {
        connect_timeout: Duration::from_secs(cli.connect_timeout),
        write_timeout: Duration::from_secs(cli.write_timeout),
        rfcomm_channel: cli.channel,
        ..BridgeConfig::default()
    };
    let adapter: Arc<dyn BluetoothAdapter> =
        Arc::new(BluezAdapter::new(config.rfcomm_channel, config.write_timeout));

    match cli.command {
        Commands::Serve { listen } => {
            config.listen_addr = listen;
            let notifications = Arc::new(NotificationLog::default());
            let session = PrinterSession::new(Some(adapter), notifications.clone())
                .with_connect_timeout(config.connect_timeout);
            let bridge = Bridge::new(Arc::new(session), Arc::new(LinuxHost::default()));
            server::serve(AppState::new(config, bridge, notifications)).await?;
        }
        Commands::Devices => {
            for device in one_shot_session(adapter, &config).paired_devices().await {
                println!("{}", device.to_linked_string());
            }
        }
        Commands::Status => {
            let enabled = one_shot_session(adapter, &config).adapter_enabled().await;
            println!("{}", enabled);
        }
        Commands::Print {
            address,
            size,
            text: content,
        } => {
            let data = text::encode_print_command(size as i64, &content);
            send_once(one_shot_session(adapter, &config), &address, data).await?;
            println!("Printed successfully!");
        }
        Commands::Write { address, bytes } => {
            let values: Vec<i64> = bytes.into_iter().map(i64::from).collect();
            let data = commands::encode_raw_write(&values);
            send_once(one_shot_session(adapter, &config), &address, data).await?;
            println!("Wrote {} bytes", values.len() + 1);
        }
    }

    Ok(())
}

fn one_shot_session(adapter: Arc<dyn BluetoothAdapter>, config: &BridgeConfig) -> PrinterSession {
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    PrinterSession::new(Some(adapter), notifier).with_connect_timeout(config.connect_timeout)
}

/// Connect, write once, disconnect.
async fn send_once(
    session: PrinterSession,
    address: &str,
    data: Vec<u8>,
) -> Result<(), PrinterError> {
    if !session.connect(address).await {
        return Err(PrinterError::Transport(format!("Could not connect to {}", address)));
    }
    let written = session.write(data).await;
    session.disconnect().await;
    if !written {
        return Err(PrinterError::Transport("Write failed".to_string()));
    }
    Ok(())
}
