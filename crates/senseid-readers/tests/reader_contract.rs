//! Integration tests for the reader contract over the simulated drivers.
//!
//! Every backend must apply the same policy: ordinary connection failure is a
//! `false` return, out-of-range settings are corrected, and session-bound
//! operations on a disconnected reader fail with `NotConnected`.

use rstest::rstest;
use senseid_core::{DeviceDescriptor, SupportedReader};
use senseid_readers::driver::{LinkFrequency, OctaneReaderMode, OctaneSearchMode, RxDecoding};
use senseid_readers::mock::{SimulatedDrivers, SimulatedHandles};
use senseid_readers::{AnyReader, HardwareError, SenseidReader, create_reader};
use std::time::Duration;
use tokio::sync::mpsc;

const UHF_KINDS: [SupportedReader; 4] = [
    SupportedReader::Nur,
    SupportedReader::Octane,
    SupportedReader::Red4s,
    SupportedReader::Llrp,
];

fn address(kind: SupportedReader) -> &'static str {
    match kind {
        SupportedReader::Nur => "/dev/ttyACM0",
        SupportedReader::Red4s => "/dev/ttyUSB0",
        SupportedReader::Octane | SupportedReader::Llrp => "192.168.1.20",
        SupportedReader::Acr1552 => "ACS ACR1552 1S CL Reader PICC 0",
        SupportedReader::KlSbleLcr => "/dev/ttyUSB1",
    }
}

async fn connected(kind: SupportedReader) -> (AnyReader<SimulatedDrivers>, SimulatedHandles) {
    let (drivers, handles) = SimulatedDrivers::new();
    let descriptor = DeviceDescriptor::new(kind, address(kind));
    let mut reader = create_reader(&descriptor, &drivers).unwrap();
    assert!(reader.connect(descriptor.address()).await.unwrap());
    (reader, handles)
}

fn uhf_handle(handles: &SimulatedHandles, kind: SupportedReader) -> &senseid_readers::mock::UhfHandle {
    match kind {
        SupportedReader::Nur => &handles.nur,
        SupportedReader::Octane => &handles.octane,
        SupportedReader::Red4s => &handles.red,
        SupportedReader::Llrp => &handles.llrp,
        other => panic!("{other} is not a UHF reader"),
    }
}

#[rstest]
#[case(SupportedReader::Nur)]
#[case(SupportedReader::Octane)]
#[case(SupportedReader::Red4s)]
#[case(SupportedReader::Llrp)]
#[case(SupportedReader::Acr1552)]
#[tokio::test]
async fn test_unreachable_reader_returns_false(#[case] kind: SupportedReader) {
    let (drivers, handles) = SimulatedDrivers::new();
    match kind {
        SupportedReader::Acr1552 => handles.acr1552.set_reachable(false),
        _ => uhf_handle(&handles, kind).set_reachable(false),
    }
    let mut reader = create_reader(&DeviceDescriptor::new(kind, address(kind)), &drivers).unwrap();

    assert!(!reader.connect(address(kind)).await.unwrap());
    assert!(!reader.is_connected());
}

#[rstest]
#[case(SupportedReader::Nur)]
#[case(SupportedReader::Octane)]
#[case(SupportedReader::Red4s)]
#[case(SupportedReader::Llrp)]
#[case(SupportedReader::Acr1552)]
#[tokio::test]
async fn test_empty_address_is_contract_violation(#[case] kind: SupportedReader) {
    let (drivers, _handles) = SimulatedDrivers::new();
    let mut reader = create_reader(&DeviceDescriptor::new(kind, address(kind)), &drivers).unwrap();

    let result = reader.connect("").await;
    assert!(matches!(result, Err(HardwareError::InvalidAddress { .. })));
}

#[rstest]
#[case(SupportedReader::Nur)]
#[case(SupportedReader::Octane)]
#[case(SupportedReader::Red4s)]
#[case(SupportedReader::Llrp)]
#[case(SupportedReader::Acr1552)]
#[tokio::test]
async fn test_disconnected_reader(#[case] kind: SupportedReader) {
    let (drivers, _handles) = SimulatedDrivers::new();
    let mut reader = create_reader(&DeviceDescriptor::new(kind, address(kind)), &drivers).unwrap();

    reader.disconnect().await.unwrap();
    assert!(matches!(
        reader.set_tx_power(20.0).await,
        Err(HardwareError::NotConnected { .. })
    ));
    assert!(matches!(
        reader.get_details().await,
        Err(HardwareError::NotConnected { .. })
    ));
    assert!(matches!(
        reader.get_antenna_config().await,
        Err(HardwareError::NotConnected { .. })
    ));
    assert!(matches!(
        reader.set_antenna_config(&[true]).await,
        Err(HardwareError::NotConnected { .. })
    ));
    let (tx, _rx) = mpsc::channel(1);
    assert!(matches!(
        reader.start_inventory_async(tx).await,
        Err(HardwareError::NotConnected { .. })
    ));
}

#[rstest]
#[case(SupportedReader::Nur, "NUR-10W", "5.11", 4, (8.0, 27.0))]
#[case(SupportedReader::Octane, "Speedway R420", "7.5.0.181", 4, (10.0, 32.5))]
#[case(SupportedReader::Red4s, "RED4S", "2.1.3", 1, (13.0, 25.0))]
#[case(SupportedReader::Llrp, "Speedway R420", "7.5.0.181", 4, (10.0, 32.5))]
#[case(SupportedReader::Acr1552, "ACR1552", "1.0.1", 1, (0.0, 0.0))]
#[tokio::test]
async fn test_details(
    #[case] kind: SupportedReader,
    #[case] model: &str,
    #[case] firmware: &str,
    #[case] antennas: usize,
    #[case] range: (f64, f64),
) {
    let (mut reader, _handles) = connected(kind).await;
    let details = reader.get_details().await.unwrap();

    assert_eq!(details.model_name, model);
    assert_eq!(details.firmware_version, firmware);
    assert_eq!(details.antenna_count, antennas);
    assert_eq!(details.tx_power_range(), range);

    // Cached: identical on the second call, and still available after disconnect.
    assert_eq!(reader.get_details().await.unwrap(), details);
    reader.disconnect().await.unwrap();
    assert_eq!(reader.get_details().await.unwrap(), details);
}

#[tokio::test]
async fn test_llrp_region_from_code_table() {
    let (mut reader, _handles) = connected(SupportedReader::Llrp).await;
    assert_eq!(reader.get_details().await.unwrap().region, "ETSI_302_208");
}

#[tokio::test]
async fn test_nur_session_setup() {
    let (_reader, handles) = connected(SupportedReader::Nur).await;
    assert_eq!(
        handles.nur.link_profile(),
        Some((LinkFrequency::Blf256, RxDecoding::Miller4))
    );
    assert_eq!(handles.nur.antennas(), vec![true, false, false, false]);
    assert_eq!(handles.nur.address().as_deref(), Some("/dev/ttyACM0"));
}

#[tokio::test]
async fn test_octane_session_setup() {
    let (mut reader, handles) = connected(SupportedReader::Octane).await;
    assert_eq!(
        handles.octane.reader_mode(),
        Some((OctaneReaderMode::DenseReaderM4, OctaneSearchMode::DualTarget, 1))
    );
    assert_eq!(handles.octane.tx_dbm(), 32.5);
    assert_eq!(reader.get_antenna_config().await.unwrap(), vec![true, false, false, false]);
}

#[rstest]
#[case(SupportedReader::Nur, 99.0, 27.0)]
#[case(SupportedReader::Nur, -99.0, 8.0)]
#[case(SupportedReader::Nur, 20.0, 20.0)]
#[case(SupportedReader::Octane, 99.0, 32.5)]
#[case(SupportedReader::Octane, 0.0, 10.0)]
#[case(SupportedReader::Octane, 20.25, 20.25)]
#[case(SupportedReader::Red4s, 30.0, 25.0)]
#[case(SupportedReader::Red4s, f64::NAN, 13.0)]
#[case(SupportedReader::Llrp, -5.0, 10.0)]
#[case(SupportedReader::Llrp, 15.5, 15.5)]
#[case(SupportedReader::Acr1552, 10.0, 0.0)]
#[tokio::test]
async fn test_tx_power_clamped(
    #[case] kind: SupportedReader,
    #[case] requested: f64,
    #[case] expected: f64,
) {
    let (mut reader, _handles) = connected(kind).await;

    assert_eq!(reader.set_tx_power(requested).await.unwrap(), expected);
    assert_eq!(reader.get_tx_power().await.unwrap(), expected);
}

#[tokio::test]
async fn test_nur_tx_power_quantized_to_attenuation_steps() {
    let (mut reader, handles) = connected(SupportedReader::Nur).await;

    assert_eq!(reader.set_tx_power(20.4).await.unwrap(), 20.0);
    assert_eq!(handles.nur.tx_level(), 7);
    assert_eq!(reader.get_tx_power().await.unwrap(), 20.0);
}

#[rstest]
#[case(SupportedReader::Nur)]
#[case(SupportedReader::Octane)]
#[case(SupportedReader::Llrp)]
#[tokio::test]
async fn test_all_disabled_antennas_force_first(#[case] kind: SupportedReader) {
    let (mut reader, handles) = connected(kind).await;

    let applied = reader
        .set_antenna_config(&[false, false, false])
        .await
        .unwrap();
    assert_eq!(applied, vec![true, false, false]);
    assert_eq!(reader.get_antenna_config().await.unwrap(), applied);
    assert_eq!(uhf_handle(&handles, kind).antennas(), applied);
}

#[rstest]
#[case(SupportedReader::Red4s)]
#[case(SupportedReader::Acr1552)]
#[tokio::test]
async fn test_single_antenna_readers(#[case] kind: SupportedReader) {
    let (mut reader, _handles) = connected(kind).await;

    assert_eq!(reader.set_antenna_config(&[false, true]).await.unwrap(), vec![true]);
    assert_eq!(reader.get_antenna_config().await.unwrap(), vec![true]);
}

#[tokio::test]
async fn test_llrp_defaults_before_any_setting() {
    let (mut reader, _handles) = connected(SupportedReader::Llrp).await;
    assert_eq!(reader.get_tx_power().await.unwrap(), 32.5);
    assert_eq!(reader.get_antenna_config().await.unwrap(), vec![true; 4]);
}

#[tokio::test]
async fn test_uhf_inventory_delivers_rain_records() {
    for kind in UHF_KINDS {
        let (mut reader, handles) = connected(kind).await;
        let handle = uhf_handle(&handles, kind);
        let (tx, mut rx) = mpsc::channel(8);

        reader.start_inventory_async(tx).await.unwrap();
        assert!(handle.inventory_running(), "{kind} inventory not running");
        assert!(handle.report_epc(&[0x30, 0x08, 0x33, 0xB2]));

        let record = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, "300833B2");
        assert_eq!(record.name, "RAIN Tag");

        reader.stop_inventory_async().await.unwrap();
        assert!(!handle.inventory_running(), "{kind} inventory still running");
        assert!(!handle.report_epc(&[0x01]));
    }
}

#[tokio::test]
async fn test_inventory_restart_replaces_sink() {
    let (mut reader, handles) = connected(SupportedReader::Octane).await;
    let (first_tx, mut first_rx) = mpsc::channel(8);
    let (second_tx, mut second_rx) = mpsc::channel(8);

    reader.start_inventory_async(first_tx).await.unwrap();
    reader.start_inventory_async(second_tx).await.unwrap();
    assert!(handles.octane.report_epc(&[0xAA]));

    assert_eq!(second_rx.recv().await.unwrap().id, "AA");
    assert!(first_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_slow_consumer_drops_records() {
    let (mut reader, handles) = connected(SupportedReader::Nur).await;
    let (tx, mut rx) = mpsc::channel(2);
    reader.start_inventory_async(tx).await.unwrap();

    let delivered = (0u8..5).filter(|i| handles.nur.report_epc(&[*i])).count();
    assert_eq!(delivered, 2);
    assert_eq!(rx.recv().await.unwrap().id, "00");
    assert_eq!(rx.recv().await.unwrap().id, "01");
}

#[tokio::test]
async fn test_disconnect_stops_inventory() {
    let (mut reader, handles) = connected(SupportedReader::Llrp).await;
    let (tx, _rx) = mpsc::channel(8);
    reader.start_inventory_async(tx).await.unwrap();

    reader.disconnect().await.unwrap();
    assert!(!handles.llrp.inventory_running());
    assert!(!handles.llrp.is_connected());

    // Idempotent.
    reader.disconnect().await.unwrap();
}

#[rstest]
#[case(SupportedReader::Nur)]
#[case(SupportedReader::Octane)]
#[case(SupportedReader::Red4s)]
#[case(SupportedReader::Llrp)]
#[tokio::test]
async fn test_device_lost_during_inventory(#[case] kind: SupportedReader) {
    let (mut reader, handles) = connected(kind).await;
    let (tx, _rx) = mpsc::channel(8);
    reader.start_inventory_async(tx).await.unwrap();

    uhf_handle(&handles, kind).unplug();
    reader.disconnect().await.unwrap();
    assert!(!reader.is_connected());

    assert!(!reader.connect(address(kind)).await.unwrap());
    assert!(!reader.is_connected());
}

#[tokio::test]
async fn test_red4s_stop_after_device_loss_is_noop() {
    let (mut reader, handles) = connected(SupportedReader::Red4s).await;
    handles.red.unplug();
    reader.stop_inventory_async().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_after_failure() {
    let (drivers, handles) = SimulatedDrivers::new();
    let descriptor = DeviceDescriptor::new(SupportedReader::Octane, "10.0.0.7");
    let mut reader = create_reader(&descriptor, &drivers).unwrap();

    handles.octane.set_reachable(false);
    assert!(!reader.connect(descriptor.address()).await.unwrap());

    handles.octane.set_reachable(true);
    assert!(reader.connect(descriptor.address()).await.unwrap());
    assert_eq!(handles.octane.address().as_deref(), Some("10.0.0.7"));
}
