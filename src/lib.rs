use std::env;
use std::path::PathBuf;
use clap::Parser;
use log::info;

use crate::config::io::ConfigIO;
use crate::device::bluetooth::{check_bluetooth, BluetoothAvailability};
use crate::dispatch::types::Notification;
use crate::error::{notice_msgbox, AppRunError};
use crate::gui::application::run_application;

pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod gui;
pub mod sim;

#[derive(Parser, Debug)]
#[command(version, about = "Shows attention, meditation, heart rate and blink readings of an EEG headset")]
pub struct Args {
    /// Path to the config file (default: next to the executable, or the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Request raw samples from the headset, overrides the config file
    #[arg(long)]
    pub raw_mode: Option<bool>,

    /// Open the window even if no bluetooth adapter is present
    #[arg(long)]
    pub skip_bluetooth_check: bool,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn init_logging(level: log::LevelFilter) {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Ok(log_file) = env::var("LOG_FILE") {
        dispatch = dispatch.chain(
            fern::log_file(log_file).expect("Failed to open LOG_FILE")
        );
    }

    dispatch.apply().expect("Failed to initialize logger");
}

fn query_bluetooth() -> Result<BluetoothAvailability, AppRunError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| AppRunError::Runtime { source })?;

    Ok(runtime.block_on(check_bluetooth()))
}

// the notification that replaces the screen, if bluetooth can not be used
fn bluetooth_notification(availability: &BluetoothAvailability) -> Option<Notification> {
    match availability {
        BluetoothAvailability::Available { adapters } => {
            info!("Bluetooth available ({} adapters)", adapters);
            None
        },
        BluetoothAvailability::PoweredOff => Some(Notification::BluetoothOff),
        BluetoothAvailability::Unavailable => Some(Notification::BluetoothUnavailable),
    }
}

pub fn run(args: Args) -> Result<(), AppRunError> {
    let config_io = ConfigIO::open(args.config.as_deref())?;
    let mut config_locker = config_io.locker()?;
    let _lock_guard = config_locker.lock()?;

    let mut config = config_io.read()?;
    if let Some(raw_mode) = args.raw_mode {
        config.raw_mode = raw_mode;
    }

    if !args.skip_bluetooth_check {
        if let Some(notification) = bluetooth_notification(&query_bluetooth()?) {
            notice_msgbox(notification.message());
            return Ok(());
        }
    }

    run_application(config)?;
    Ok(())
}
