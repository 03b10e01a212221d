//! Property tests for repeated uploads.

use proptest::prelude::*;

use crate::common::*;

use locsync::domain::entities::LocationStub;
use locsync::infrastructure::InMemoryTreeStore;

/// Random tree over `state > county > city`
fn tree() -> impl Strategy<Value = Vec<LocationStub>> {
    proptest::collection::vec((0usize..3, any::<prop::sample::Index>()), 1..20).prop_map(|nodes| {
        let levels = ["state", "county", "city"];
        let mut placed: Vec<(usize, String)> = Vec::new();
        let mut stubs = Vec::new();

        for (i, (level, pick)) in nodes.into_iter().enumerate() {
            let parents: Vec<&String> = placed
                .iter()
                .filter(|(l, _)| level > 0 && *l == level - 1)
                .map(|(_, code)| code)
                .collect();
            let (level, parent) = if parents.is_empty() {
                (0, String::new())
            } else {
                (level, parents[pick.index(parents.len())].clone())
            };

            let code = format!("n{i}");
            stubs.push(loc(&format!("N{i}"), &code, levels[level], &parent));
            placed.push((level, code));
        }
        stubs
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the stored tree mirrors the upload.
    #[test]
    fn property_upload_is_mirrored(locations in tree()) {
        let mut store = InMemoryTreeStore::new();
        let result = import(&mut store, flat_types(), locations.clone());

        prop_assert!(result.success(), "{:?}", result.errors);
        prop_assert_eq!(result.summary.locations_created, locations.len());
        prop_assert_eq!(stored_pairs(&store), as_pairs(&locations));
    }

    /// PROPERTY: repeating an upload writes nothing.
    #[test]
    fn property_second_upload_is_a_no_op(locations in tree()) {
        let mut store = InMemoryTreeStore::new();
        prop_assert!(import(&mut store, flat_types(), locations.clone()).success());
        let before = store.trees();
        let writes = store.write_count();

        let again = import(&mut store, flat_types(), locations.clone());

        prop_assert!(again.success(), "{:?}", again.errors);
        prop_assert_eq!(again.summary.written_count(), 0);
        prop_assert_eq!(again.summary.locations_unchanged, locations.len());
        prop_assert_eq!(store.write_count(), writes);
        prop_assert_eq!(store.trees(), before);
    }
}
