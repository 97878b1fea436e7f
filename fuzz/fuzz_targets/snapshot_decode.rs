#![no_main]

use arbitrary::Arbitrary;
use caro_store::medium::file::Snapshot;
use caro_store::medium::MediumError;
use caro_store::{KeyValueStore, MemoryMedium, StorageMedium};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
struct SnapshotTestCase {
    /// Raw bytes handed to the snapshot decoder
    raw: Vec<u8>,
    /// Entries to seal, then flip one byte of the encoding
    entries: BTreeMap<String, String>,
    flip_index: u16,
    flip_mask: u8,
}

fuzz_target!(|test_case: SnapshotTestCase| {
    // Property 1: decoding arbitrary bytes never panics
    let _ = Snapshot::decode(&test_case.raw);

    // Property 2: a sealed snapshot always decodes to its entries
    let Ok(sealed) = Snapshot::seal(test_case.entries.clone()) else {
        return;
    };
    let Ok(mut bytes) = serde_json::to_vec(&sealed) else {
        return;
    };
    assert_eq!(
        Snapshot::decode(&bytes).ok().as_ref(),
        Some(&test_case.entries),
        "sealed snapshot failed to decode"
    );

    // Property 3: a flipped byte is either rejected or decodes to the same entries
    if test_case.flip_mask != 0 && !bytes.is_empty() {
        let index = test_case.flip_index as usize % bytes.len();
        bytes[index] ^= test_case.flip_mask;

        match Snapshot::decode(&bytes) {
            Ok(entries) => assert_eq!(
                entries, test_case.entries,
                "tampered snapshot decoded to different entries"
            ),
            Err(MediumError::Corrupted(_)) | Err(MediumError::UnsupportedVersion(_)) => {}
            Err(other) => panic!("unexpected error for tampered snapshot: {other}"),
        }
    }

    // Property 4: every stored text reads back as its JSON parse or None
    let mut medium = MemoryMedium::new();
    for (key, text) in &test_case.entries {
        let _ = medium.write(key, text.clone());
    }
    let store = KeyValueStore::new(medium);
    for (key, text) in &test_case.entries {
        assert_eq!(
            store.get(key),
            serde_json::from_str::<serde_json::Value>(text).ok()
        );
    }
});
