//! Property tests for tx power and antenna normalization on live readers.

use proptest::prelude::*;
use senseid_core::{DeviceDescriptor, SupportedReader};
use senseid_readers::mock::SimulatedDrivers;
use senseid_readers::{SenseidReader, create_reader};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn continuous_kind() -> impl Strategy<Value = (SupportedReader, &'static str)> {
    prop_oneof![
        Just((SupportedReader::Octane, "192.168.1.20")),
        Just((SupportedReader::Red4s, "/dev/ttyUSB0")),
        Just((SupportedReader::Llrp, "192.168.1.21")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Readers with a continuous power range apply exactly the clamped value.
    #[test]
    fn set_then_get_is_clamped(
        (kind, address) in continuous_kind(),
        requested in -50.0f64..80.0,
    ) {
        let rt = runtime();
        let (applied, read_back, min, max) = rt.block_on(async {
            let (drivers, _handles) = SimulatedDrivers::new();
            let mut reader = create_reader(&DeviceDescriptor::new(kind, address), &drivers).unwrap();
            assert!(reader.connect(address).await.unwrap());
            let details = reader.get_details().await.unwrap();
            let applied = reader.set_tx_power(requested).await.unwrap();
            let read_back = reader.get_tx_power().await.unwrap();
            (applied, read_back, details.min_tx_power, details.max_tx_power)
        });

        prop_assert_eq!(applied, requested.clamp(min, max));
        prop_assert_eq!(read_back, applied);
    }

    /// NUR power is quantized, but always within range and within half a
    /// step of the clamped request.
    #[test]
    fn nur_power_within_half_step(requested in -50.0f64..80.0) {
        let rt = runtime();
        let (applied, read_back) = rt.block_on(async {
            let (drivers, _handles) = SimulatedDrivers::new();
            let mut reader =
                create_reader(&DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0"), &drivers)
                    .unwrap();
            assert!(reader.connect("/dev/ttyACM0").await.unwrap());
            let applied = reader.set_tx_power(requested).await.unwrap();
            (applied, reader.get_tx_power().await.unwrap())
        });

        prop_assert!((8.0..=27.0).contains(&applied));
        prop_assert!((applied - requested.clamp(8.0, 27.0)).abs() <= 0.5);
        prop_assert_eq!(read_back, applied);
    }

    /// NUR grid points are reproduced exactly.
    #[test]
    fn nur_grid_points_exact(level in 0u32..=19) {
        let requested = 27.0 - f64::from(level);
        let rt = runtime();
        let applied = rt.block_on(async {
            let (drivers, handles) = SimulatedDrivers::new();
            let mut reader =
                create_reader(&DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0"), &drivers)
                    .unwrap();
            assert!(reader.connect("/dev/ttyACM0").await.unwrap());
            let applied = reader.set_tx_power(requested).await.unwrap();
            assert_eq!(handles.nur.tx_level(), level);
            applied
        });

        prop_assert_eq!(applied, requested);
    }

    /// The applied antenna configuration is the request, with antenna 1
    /// forced on only when nothing was enabled.
    #[test]
    fn antenna_config_keeps_one_enabled(config in prop::collection::vec(any::<bool>(), 1..8)) {
        let rt = runtime();
        let applied = rt.block_on(async {
            let (drivers, _handles) = SimulatedDrivers::new();
            let mut reader =
                create_reader(&DeviceDescriptor::new(SupportedReader::Octane, "10.0.0.2"), &drivers)
                    .unwrap();
            assert!(reader.connect("10.0.0.2").await.unwrap());
            reader.set_antenna_config(&config).await.unwrap()
        });

        prop_assert!(applied.contains(&true));
        prop_assert_eq!(applied.len(), config.len());
        if config.contains(&true) {
            prop_assert_eq!(applied, config);
        } else {
            prop_assert!(applied[0]);
            prop_assert!(applied[1..].iter().all(|enabled| !enabled));
        }
    }
}
