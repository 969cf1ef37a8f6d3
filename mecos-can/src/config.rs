use std::{fs::read_to_string, path::Path, time::Duration};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::protocol::{ReaderConfig, DEFAULT_RX_TIMEOUT};

/// Optional env file consulted before the configuration path is resolved.
pub const MECOS_ENV: &str = ".env";
/// Env variable holding the configuration file path.
pub const MECOS_CONFIG_VAR: &str = "MECOS_CAN_CONFIG";
pub const DEFAULT_CONFIG_FILENAME: &str = "mecos-can.yaml";

pub const DEFAULT_INTERFACE: &str = "can0";
pub const DEFAULT_BITRATE: u32 = 1_000_000;
pub const DEFAULT_TIMEOUT_MS: u64 = DEFAULT_RX_TIMEOUT.as_millis() as u64;

/// Load `.env` into the process environment. Variables already set win.
///
/// Call before parsing command line arguments that fall back to env variables.
pub fn load_env() -> bool {
    load_env_from(MECOS_ENV)
}

pub fn load_env_from<P: AsRef<Path>>(path: P) -> bool {
    match dotenvy::from_filename(path.as_ref()) {
        Ok(_) => true,
        Err(e) => {
            log::trace!("MECOS-CAN - `{}` not loaded: {}", path.as_ref().display(), e);
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
#[serde(default)]
pub struct BusConfig {
    interface: String,
    #[getter(copy)]
    bitrate: Option<u32>,
    /// Bring the interface down, set the bitrate and bring it up before use.
    #[getter(copy)]
    manage_link: bool,
    /// Run the link commands through `sudo`.
    #[getter(copy)]
    sudo: bool,
    #[getter(copy)]
    deadline_ms: u64,
    #[getter(copy)]
    receive_timeout_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.into(),
            bitrate: Some(DEFAULT_BITRATE),
            manage_link: false,
            sudo: false,
            deadline_ms: DEFAULT_TIMEOUT_MS,
            receive_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BusConfig {
    /// Load from the file named by `MECOS_CAN_CONFIG` (optionally set in `.env`),
    /// else `mecos-can.yaml`. A missing file yields the defaults.
    pub fn load() -> Result<Self, Error> {
        load_env();
        let path = std::env::var(MECOS_CONFIG_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILENAME.into());

        Self::from_file(&path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("MECOS-CAN - no configuration at `{}`, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Unable to read `{}`: {:?}", path.display(), e)))?;
        Self::from_yaml_str(&data)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, Error> {
        serde_yaml::from_str(data)
            .map_err(|e| Error::ConfigError(format!("Error parsing YAML: {:?}", e)))
    }

    pub fn set_interface<S: Into<String>>(&mut self, interface: S) -> &mut Self {
        self.interface = interface.into();
        self
    }

    pub fn set_bitrate(&mut self, bitrate: u32) -> &mut Self {
        self.bitrate = Some(bitrate);
        self
    }

    pub fn set_manage_link(&mut self, manage_link: bool) -> &mut Self {
        self.manage_link = manage_link;
        self
    }

    /// Sets both the overall deadline and the per-receive ceiling.
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) -> &mut Self {
        self.deadline_ms = timeout_ms;
        self.receive_timeout_ms = timeout_ms;
        self
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            deadline: Duration::from_millis(self.deadline_ms),
            receive_timeout: Duration::from_millis(self.receive_timeout_ms),
        }
    }
}
