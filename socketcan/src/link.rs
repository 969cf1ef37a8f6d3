//! Interface link state, driven through iproute2.
//!
//! The bitrate of a CAN interface can only change while it is down, so
//! [`LinkGuard::up`] takes it down, configures it and brings it back up.
//! Dropping the guard takes the interface down again.

use std::{path::PathBuf, process::Command};
use mecos_can::error::Error;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// `true` when the network interface exists at all.
pub fn interface_exists(interface: &str) -> bool {
    PathBuf::from(SYS_CLASS_NET).join(interface).exists()
}

/// `true` when the interface is a real CAN controller with configurable bit timing.
pub fn has_bittiming(interface: &str) -> bool {
    PathBuf::from(SYS_CLASS_NET)
        .join(interface)
        .join("can_bittiming/bitrate")
        .exists()
}

/// The `ip` argument lists run to bring `interface` up at `bitrate`.
pub fn up_commands(interface: &str, bitrate: Option<u32>) -> Vec<Vec<String>> {
    let mut commands = vec![down_command(interface)];
    if let Some(bitrate) = bitrate {
        commands.push(
            ["link", "set", interface, "type", "can", "bitrate", &bitrate.to_string()]
                .map(String::from)
                .to_vec()
        );
    }
    commands.push(["link", "set", interface, "up"].map(String::from).to_vec());
    commands
}

pub fn down_command(interface: &str) -> Vec<String> {
    ["link", "set", interface, "down"].map(String::from).to_vec()
}

#[derive(Debug)]
pub struct LinkGuard {
    interface: String,
    sudo: bool,
}

impl LinkGuard {
    pub fn up(interface: &str, bitrate: Option<u32>, sudo: bool) -> Result<Self, Error> {
        if bitrate.is_some() && !has_bittiming(interface) {
            return Err(Error::channel_open_failed(interface, "no configurable CAN bit timing"));
        }

        for args in up_commands(interface, bitrate) {
            run_ip(&args, sudo)?;
        }
        log::info!("SocketCAN - {} up, bitrate: {:?}", interface, bitrate);

        Ok(Self { interface: interface.into(), sudo })
    }
}

impl Drop for LinkGuard {
    fn drop(&mut self) {
        match run_ip(&down_command(&self.interface), self.sudo) {
            Ok(()) => log::info!("SocketCAN - {} down", self.interface),
            Err(e) => log::warn!("SocketCAN - error {} when bringing {} down", e, self.interface),
        }
    }
}

fn run_ip(args: &[String], sudo: bool) -> Result<(), Error> {
    let mut command = if sudo {
        let mut c = Command::new("sudo");
        c.arg("ip");
        c
    } else {
        Command::new("ip")
    };
    command.args(args);
    log::debug!("SocketCAN - running {:?}", command);

    let status = command.status()
        .map_err(|e| Error::OperationError(format!("unable to run `ip {}`: {}", args.join(" "), e)))?;
    if !status.success() {
        return Err(Error::OperationError(format!("`ip {}` failed with {}", args.join(" "), status)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_commands() {
        let commands = up_commands("can0", Some(1_000_000));
        assert_eq!(commands, vec![
            vec!["link", "set", "can0", "down"],
            vec!["link", "set", "can0", "type", "can", "bitrate", "1000000"],
            vec!["link", "set", "can0", "up"],
        ]);

        let commands = up_commands("vcan0", None);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], vec!["link", "set", "vcan0", "up"]);
    }

    #[test]
    fn test_missing_interface() {
        assert!(!interface_exists("mecos-missing0"));
        assert!(!has_bittiming("mecos-missing0"));
        match LinkGuard::up("mecos-missing0", Some(1_000_000), false) {
            Err(Error::ChannelOpenError(iface, _)) => assert_eq!(iface, "mecos-missing0"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
