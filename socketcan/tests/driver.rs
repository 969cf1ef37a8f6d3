//! Needs a virtual CAN interface:
//!
//! ```text
//! sudo modprobe vcan
//! sudo ip link add dev vcan0 type vcan
//! sudo ip link set vcan0 up
//! ```

use std::{thread, time::Duration};
use mecos_can::{error::Error, protocol::{read_actual_speed, write_setpoint, QueryOutcome, ReaderConfig}, BusChannel, CanFrame, Filter, StandardId};
use mecos_socketcan::SocketCan;

const IFACE: &str = "vcan0";

fn frame(id: u16, hex_data: &str) -> anyhow::Result<CanFrame> {
    let data = hex::decode(hex_data)?;
    CanFrame::new(StandardId::new_unchecked(id), &data)
        .ok_or_else(|| anyhow::anyhow!("payload too long"))
}

#[test]
#[ignore = "requires vcan0"]
fn test_read_actual_speed() -> anyhow::Result<()> {
    let mut device = SocketCan::open(IFACE)?;
    device.set_receive_filter(&[Filter::standard(StandardId::new_unchecked(0x340))])?;

    let stray = frame(0x2C0, "4002200001000000")?;
    let answer = frame(0x2C0, "4001200058020000")?;
    let responder = thread::spawn(move || -> Result<CanFrame, Error> {
        let request = device.receive(Duration::from_secs(2))?;
        device.send(&stray)?;
        device.send(&answer)?;
        device.close();
        Ok(request)
    });

    // give the responder time to start listening
    thread::sleep(Duration::from_millis(50));
    let channel = SocketCan::open(IFACE)?;
    let outcome = read_actual_speed(channel, &ReaderConfig::default())?;
    assert_eq!(outcome, QueryOutcome::Answered(600));

    let request = responder.join().map_err(|_| anyhow::anyhow!("responder panicked"))??;
    assert_eq!(request.id_bits(), 0x340);
    assert_eq!(request.data(), hex::decode("c0012000")?);

    Ok(())
}

#[test]
#[ignore = "requires vcan0"]
fn test_read_actual_speed_timeout() -> anyhow::Result<()> {
    let channel = SocketCan::open(IFACE)?;
    let config = ReaderConfig {
        deadline: Duration::from_millis(200),
        receive_timeout: Duration::from_millis(200),
    };
    let outcome = read_actual_speed(channel, &config)?;
    assert!(outcome.hz().is_none());

    Ok(())
}

#[test]
#[ignore = "requires vcan0"]
fn test_write_setpoint() -> anyhow::Result<()> {
    let mut monitor = SocketCan::open(IFACE)?;
    monitor.set_receive_filter(&[Filter::standard(StandardId::new_unchecked(0x1C0))])?;

    write_setpoint(SocketCan::open(IFACE)?, 1000)?;

    let command = monitor.receive(Duration::from_secs(1))?;
    assert_eq!(command.data(), hex::decode("c0002000e8030000")?);

    Ok(())
}

#[test]
fn test_open_missing_interface() {
    match SocketCan::open("mecos-missing0") {
        Err(Error::ChannelOpenError(iface, _)) => assert_eq!(iface, "mecos-missing0"),
        other => panic!("unexpected: {:?}", other),
    }
}
