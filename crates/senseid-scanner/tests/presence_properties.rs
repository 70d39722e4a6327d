//! Property tests for transition edge detection.

use proptest::prelude::*;
use senseid_core::{DeviceDescriptor, SupportedReader};
use senseid_scanner::{Observation, PresenceSet};
use std::collections::BTreeSet;

const PORTS: [&str; 4] = ["/dev/ttyACM0", "/dev/ttyACM1", "/dev/ttyUSB0", "/dev/ttyUSB1"];
const KINDS: [SupportedReader; 3] = [
    SupportedReader::Nur,
    SupportedReader::Red4s,
    SupportedReader::KlSbleLcr,
];

/// A listing: for each port, the subset of kinds recognised there.
fn observation() -> impl Strategy<Value = Observation> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), KINDS.len()), PORTS.len()).prop_map(
        |masks| {
            let mut observation = Observation::new();
            for (port, mask) in PORTS.iter().zip(masks) {
                let descriptors: Vec<DeviceDescriptor> = KINDS
                    .iter()
                    .zip(mask)
                    .filter(|(_, present)| *present)
                    .map(|(kind, _)| DeviceDescriptor::new(*kind, *port))
                    .collect();
                if !descriptors.is_empty() {
                    observation.insert(port.to_string(), descriptors);
                }
            }
            observation
        },
    )
}

fn flatten(observation: &Observation) -> BTreeSet<String> {
    observation
        .values()
        .flatten()
        .map(|descriptor| descriptor.to_string())
        .collect()
}

proptest! {
    /// Replaying the transitions of any sequence of listings reproduces the
    /// last listing, and every edge is a real state change.
    #[test]
    fn transitions_track_listings(listings in prop::collection::vec(observation(), 1..12)) {
        let mut presence = PresenceSet::new();
        let mut replayed: BTreeSet<String> = BTreeSet::new();

        for listing in listings {
            let expected = flatten(&listing);
            let transitions = presence.reconcile(listing);

            for removed in &transitions.removed {
                prop_assert!(replayed.remove(&removed.to_string()), "removed unknown {}", removed);
            }
            for added in &transitions.added {
                prop_assert!(replayed.insert(added.to_string()), "added twice {}", added);
            }
            prop_assert_eq!(&replayed, &expected);
        }
    }

    /// Observing the same listing twice never produces an edge.
    #[test]
    fn repeated_listing_is_silent(listing in observation()) {
        let mut presence = PresenceSet::new();
        presence.reconcile(listing.clone());
        prop_assert!(presence.reconcile(listing).is_empty());
    }
}
