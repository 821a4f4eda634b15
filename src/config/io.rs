use std::env::{current_exe};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::str;
use directories_next::{ProjectDirs};
use fd_lock::{RwLock, RwLockWriteGuard};
use log::{info, warn};
use serde_json;

use crate::config::types::Config;
use crate::error::ConfigError;

// creates a path to <exe name>.json in the same directory as the executable
// this could be useful for usb sticks
fn get_portable_config_path() -> Option<PathBuf> {
    match current_exe() {
        Ok(mut path) => {
            // F:\eeg-starter.exe => F:\eeg-starter.json
            if !path.set_extension("json") {
                warn!("current exe has no filename: {}", path.to_string_lossy());
                return None
            }

            Some(path)
        },
        Err(err) => {
            warn!("failed to get current exe path: {:?}", err);
            None
        },
    }
}

// creates a path to eeg-starter.json in an os dependent standard directory, such as %AppData% on
// windows.
fn get_local_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "eegstarter", "eeg-starter").map(|dirs| {
        dirs.config_dir().join("eeg-starter.json")
    })
}

fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = get_portable_config_path() {
        match std::fs::metadata(&path) {
            Ok(attr) if attr.is_file() => return Ok(path),
            Ok(_) => {},
            Err(err) => {
                info!("No portable config at {}; Using local path instead. ({})", path.to_string_lossy(), err);
            },
        }
    }

    match get_local_config_path() {
        None => Err(ConfigError::NoConfigPath),
        Some(path) => Ok(path),
    }
}

pub struct ConfigIOLocker {
    rw_lock: RwLock<File>,
}

impl ConfigIOLocker {
    pub fn lock(&mut self) -> Result<RwLockWriteGuard<File>, ConfigError> {
        match self.rw_lock.try_write() {
            Ok(guard) => Ok(guard),
            Err(source) => Err(ConfigError::CanNotLock { source }),
        }
    }
}

pub struct ConfigIO {
    file: File,
}

impl ConfigIO {
    /// Open the config file at `path`, or at the default location if `path` is `None`. The file
    /// is created if it does not exist yet.
    pub fn open(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => get_config_path()?,
        };
        info!("Using config file {}", path.to_string_lossy());

        if let Some(directory) = path.parent() {
            if !directory.as_os_str().is_empty() {
                std::fs::create_dir_all(directory)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(false)
            .append(false)
            .create(true)
            .open(&path)?;

        Ok(ConfigIO { file })
    }

    // obtain an exclusive file lock so that this config file (and thus the headset) is used by
    // only one instance of this application.
    pub fn locker(&self) -> Result<ConfigIOLocker, ConfigError> {
        Ok(ConfigIOLocker {
            rw_lock: RwLock::new(self.file.try_clone()?),
        })
    }

    /// Read the config. An empty file yields the defaults, which are written back so that they
    /// can be edited.
    pub fn read(&self) -> Result<Config, ConfigError> {
        let mut file = self.file.try_clone()?;
        file.rewind()?;

        let mut content = vec![];
        file.read_to_end(&mut content)?;

        if content.iter().all(|byte| byte.is_ascii_whitespace()) {
            info!("Config file is empty, writing defaults");
            let config = Config::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = str::from_utf8(&content)?;
        let config: Config = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let mut file = self.file.try_clone()?;

        let content = serde_json::to_string_pretty(config)?;
        file.rewind()?;
        file.set_len(0)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
