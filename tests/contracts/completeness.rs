//! Completeness contracts (LIST-001 through LIST-003)
//!
//! An upload against an existing tree must list every type and every
//! location, even the ones it does not change.

use crate::common::*;

use locsync::TreeStore;

/// CONTRACT LIST-001: Omitting an existing type is an error
#[test]
fn contract_unlisted_type_is_rejected() {
    let mut store = seeded_store();
    let types = vec![type_stub("state", ""), type_stub("city", "state")];
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .filter(|l| l.location_type != "county")
        .map(|l| match l.location_type.as_str() {
            "city" => loc(&l.name, l.site_code(), "city", "s1"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, types, locations);

    assert!(result.errors.iter().any(|e| e.starts_with(
        "Location type code 'county' is not listed in the upload"
    )));
    assert!(store.list_types(TENANT).unwrap().iter().any(|t| t.code == "county"));
}

/// CONTRACT LIST-002: Omitting an existing location is an error
#[test]
fn contract_unlisted_location_is_rejected() {
    let mut store = seeded_store();
    let city112 = location_id(&store, "city112");
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .filter(|l| l.site_code() != "city112")
        .collect();

    let result = import(&mut store, flat_types(), locations);

    assert_eq!(
        result.errors,
        vec![format!(
            "Location 'city112' (id: {city112}) is not listed in the upload. All locations should be listed"
        )]
    );
}

/// CONTRACT LIST-003: A new tenant is exempt, it has nothing to list
#[test]
fn contract_new_tenant_needs_no_full_listing() {
    let mut store = seeded_store();
    let result = locsync::NewLocationImporter::new(
        &mut store,
        vec![type_stub("region", "")],
        vec![loc("North", "north", "region", "")],
    )
    .run(&locsync::ImportOptions::new("another-tenant"))
    .unwrap();

    assert!(result.success(), "{:?}", result.errors);
}
