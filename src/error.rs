use std::io;
use thiserror::Error;
use msgbox::IconType;
use std::fmt::Display;
use std::str::Utf8Error;
use btleplug;
use iced;
use serde_json;

pub const APP_TITLE: &str = concat!("EEG Starter ", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine path to config file")]
    NoConfigPath,

    #[error("Failed to acquire file lock on config file: {source}")]
    CanNotLock { source: io::Error },

    #[error("Failed to encode/decode config as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read/write config file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse/build config file: {source}")]
    JsonError { #[from] source: serde_json::Error },
}

#[derive(Error, Debug)]
pub enum AppRunError {
    #[error("Failed to start application (iced): {source}")]
    Iced { #[from] source: iced::Error },

    #[error("Failed to start application (config): {source}")]
    ConfigError { #[from] source: ConfigError },

    #[error("Failed to start async runtime: {source}")]
    Runtime { source: io::Error },
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Error communicating with bluetooth stack (btleplug): {source}")]
    Btle { #[from] source: btleplug::Error },
}

#[derive(Error, Debug)]
pub enum LinkOpenError {
    #[error("Only http and https links can be opened")]
    NotHttp,

    #[error("Failed to open link: {source}")]
    Open { #[from] source: io::Error },
}

pub fn notice_msgbox(message: &str) {
    eprintln!("{}", message);
    if let Err(err) = msgbox::create(APP_TITLE, message, IconType::Info) {
        eprintln!("Failed to create msgbox: {:?}", err);
    }
}

pub fn error_msgbox<T: Display>(message: &'static str, error: &T) {
    let message = format!("{}: {}", message, error);
    eprintln!("{}", &message);
    if let Err(err) = msgbox::create(APP_TITLE, &message, IconType::Error) {
        eprintln!("Failed to create msgbox: {:?}", err);
    }
}
