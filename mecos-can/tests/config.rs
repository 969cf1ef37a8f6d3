use std::time::Duration;
use mecos_can::{config::{BusConfig, DEFAULT_TIMEOUT_MS}, error::Error, protocol::{ReaderConfig, DEFAULT_RX_TIMEOUT}};

#[test]
fn test_defaults() {
    let cfg = BusConfig::default();
    assert_eq!(cfg.interface(), "can0");
    assert_eq!(cfg.bitrate(), Some(1_000_000));
    assert!(!cfg.manage_link());

    let reader = cfg.reader_config();
    assert_eq!(reader.deadline, Duration::from_secs(4));
    assert_eq!(reader.receive_timeout, Duration::from_secs(4));
}

#[test]
fn test_default_timeout_single_source() {
    assert_eq!(Duration::from_millis(DEFAULT_TIMEOUT_MS), DEFAULT_RX_TIMEOUT);
    assert_eq!(BusConfig::default().reader_config(), ReaderConfig::default());
}

#[test]
fn test_from_yaml() -> anyhow::Result<()> {
    let cfg = BusConfig::from_yaml_str("
interface: vcan0
manage_link: true
deadline_ms: 1500
")?;
    assert_eq!(cfg.interface(), "vcan0");
    assert!(cfg.manage_link());
    assert_eq!(cfg.bitrate(), Some(1_000_000));
    assert_eq!(cfg.reader_config().deadline, Duration::from_millis(1500));
    assert_eq!(cfg.reader_config().receive_timeout, Duration::from_secs(4));

    Ok(())
}

#[test]
fn test_bad_yaml() {
    match BusConfig::from_yaml_str("deadline_ms: soon") {
        Err(Error::ConfigError(_)) => {},
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_missing_file_gives_defaults() -> anyhow::Result<()> {
    let cfg = BusConfig::from_file("does/not/exist.yaml")?;
    assert_eq!(cfg, BusConfig::default());

    Ok(())
}

#[test]
fn test_overrides() {
    let mut cfg = BusConfig::default();
    cfg.set_interface("can1")
        .set_bitrate(500_000)
        .set_timeout_ms(250);
    assert_eq!(cfg.interface(), "can1");
    assert_eq!(cfg.bitrate(), Some(500_000));
    assert_eq!(cfg.reader_config().deadline, Duration::from_millis(250));
}
