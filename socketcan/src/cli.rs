//! Shared plumbing for the command line tools.

use std::path::PathBuf;
use clap::Args;
use mecos_can::{config::BusConfig, error::Error, BusChannel};
use crate::{link::{interface_exists, LinkGuard}, SocketCan};

#[derive(Debug, Args)]
pub struct BusArgs {
    /// CAN interface, e.g. can0 or vcan0
    #[arg(short, long, env = "MECOS_CAN_INTERFACE")]
    pub interface: Option<String>,
    /// Bitrate applied when the link is managed
    #[arg(short, long)]
    pub bitrate: Option<u32>,
    /// Take the interface down, set its bitrate and bring it up, then down again on exit
    #[arg(long)]
    pub manage_link: bool,
    /// YAML configuration file
    #[arg(short, long, env = "MECOS_CAN_CONFIG")]
    pub config: Option<PathBuf>,
    /// Trace every frame sent and received
    #[arg(short, long)]
    pub debug: bool,
}

impl BusArgs {
    pub fn init_logger(&self) {
        let level = if self.debug { "trace" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .init();
    }

    /// The configuration file, with command line values on top.
    pub fn load_config(&self) -> Result<BusConfig, Error> {
        let mut config = match &self.config {
            Some(path) => BusConfig::from_file(path)?,
            None => BusConfig::load()?,
        };

        if let Some(interface) = &self.interface {
            config.set_interface(interface.as_str());
        }
        if let Some(bitrate) = self.bitrate {
            config.set_bitrate(bitrate);
        }
        if self.manage_link {
            config.set_manage_link(true);
        }

        Ok(config)
    }
}

/// Bring the link up if asked to, open a channel and hand it to `f`.
///
/// The channel is released by `f`; the link, if managed, goes down afterwards.
pub fn with_channel<T, F>(config: &BusConfig, f: F) -> Result<T, Error>
where
    F: FnOnce(SocketCan) -> Result<T, Error>,
{
    let interface = config.interface();
    if !interface_exists(interface) {
        return Err(Error::channel_open_failed(interface.as_str(), "device does not exist"));
    }

    let _link = if config.manage_link() {
        Some(LinkGuard::up(interface, config.bitrate(), config.sudo())?)
    } else {
        None
    };

    let channel = SocketCan::open(interface)?;
    f(channel)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use mecos_can::config::load_env_from;
    use super::BusArgs;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        bus: BusArgs,
    }

    #[test]
    fn test_env_file_reaches_arguments() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("mecos-cli-{}.env", std::process::id()));
        std::fs::write(&path, "MECOS_CAN_INTERFACE=vcan7\n")?;

        assert!(load_env_from(&path));
        let args = TestArgs::try_parse_from(["mecos-hz-read"])?;
        std::fs::remove_file(&path)?;

        assert_eq!(args.bus.interface.as_deref(), Some("vcan7"));
        assert_eq!(args.bus.load_config()?.interface(), "vcan7");

        Ok(())
    }
}
