//! Property tests for location identity resolution.

use proptest::prelude::*;

use locsync::domain::entities::{LocationCollection, LocationRecord, LocationStub};

fn site_code() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

fn snapshot(site_code: &str) -> LocationCollection {
    LocationCollection::from_records(
        Vec::new(),
        vec![LocationRecord::new("loc-1", site_code, "Somewhere", "city")],
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a row naming only the site code adopts the stored id,
    /// whatever the case of the cell.
    #[test]
    fn property_site_code_resolves_to_id(code in site_code(), shout in any::<bool>()) {
        let existing = snapshot(&code);
        let cell = if shout { code.to_uppercase() } else { code.clone() };
        let mut stub = LocationStub::new("Somewhere", &cell, "city", "", "", 0).unwrap();

        stub.autoset_identity(Some(&existing)).unwrap();

        prop_assert_eq!(stub.location_id.as_deref(), Some("loc-1"));
        prop_assert_eq!(stub.site_code(), code.as_str());
        prop_assert!(!stub.is_new);
    }

    /// PROPERTY: a row naming only the id adopts the stored site code.
    #[test]
    fn property_id_resolves_to_site_code(code in site_code()) {
        let existing = snapshot(&code);
        let mut stub = LocationStub::new("Somewhere", "", "city", "", "loc-1", 0).unwrap();

        stub.autoset_identity(Some(&existing)).unwrap();

        prop_assert_eq!(stub.site_code(), code.as_str());
        prop_assert!(!stub.is_new);
    }

    /// PROPERTY: an unknown site code always describes a new location.
    #[test]
    fn property_unknown_site_code_is_new(code in site_code()) {
        let existing = snapshot("zz-not-generated");
        let mut stub = LocationStub::new("Elsewhere", &code, "city", "", "", 0).unwrap();

        stub.autoset_identity(Some(&existing)).unwrap();

        prop_assert!(stub.is_new);
        prop_assert!(stub.location_id.is_none());
    }
}
