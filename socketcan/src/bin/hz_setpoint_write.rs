//! Change the MECOS chopper speed setpoint via CAN.

use clap::Parser;
use mecos_can::config::load_env;
use mecos_can::protocol::{parse_setpoint, write_setpoint};
use mecos_socketcan::cli::{with_channel, BusArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Desired speed in Hz (0..=65535)
    #[arg(value_parser = parse_hz)]
    hz: u16,
    #[command(flatten)]
    bus: BusArgs,
}

fn parse_hz(value: &str) -> Result<u16, String> {
    parse_setpoint(value).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    load_env();
    let args = Args::parse();
    args.bus.init_logger();

    let config = args.bus.load_config()?;
    println!("Required setpoint: {} Hz", args.hz);
    with_channel(&config, |channel| write_setpoint(channel, args.hz))?;

    Ok(())
}
