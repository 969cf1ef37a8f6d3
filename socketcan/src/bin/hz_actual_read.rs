//! Read back the MECOS chopper actual speed via CAN.

use std::process::ExitCode;
use clap::Parser;
use mecos_can::config::load_env;
use mecos_can::protocol::{read_actual_speed, QueryOutcome};
use mecos_socketcan::cli::{with_channel, BusArgs};

/// Exit status when the device did not answer in time.
const EXIT_TIMEOUT: u8 = 3;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    bus: BusArgs,
    /// Overall wait for the answer, in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,
}

fn main() -> anyhow::Result<ExitCode> {
    load_env();
    let args = Args::parse();
    args.bus.init_logger();

    let mut config = args.bus.load_config()?;
    if let Some(timeout_ms) = args.timeout_ms {
        config.set_timeout_ms(timeout_ms);
    }
    let reader = config.reader_config();

    log::debug!("Sending request to MECOS via a REQ_MPDO message");
    let outcome = with_channel(&config, |channel| read_actual_speed(channel, &reader))?;

    match outcome {
        QueryOutcome::Answered(hz) => {
            println!("MECOS actual speed: {} Hz", hz);
            Ok(ExitCode::SUCCESS)
        },
        QueryOutcome::ReceiveTimeout |
        QueryOutcome::DeadlineElapsed { .. } => {
            eprintln!("Timed out: no answer from MECOS on {} within {:?}", config.interface(), reader.deadline);
            Ok(ExitCode::from(EXIT_TIMEOUT))
        },
    }
}
