//! Scenario: A tenant edits an existing tree
//!
//! Journey: download the tree, rearrange it in a spreadsheet, upload it
//! again. Each upload lists every type and location.
//!
//! Success Criteria:
//! - The stored tree matches the upload exactly
//! - Repeating an upload changes nothing

use crate::common::*;

use locsync::domain::entities::LocationStub;
use locsync::infrastructure::InMemoryTreeStore;
use locsync::TreeStore;

/// A city row that keeps its identity under a new site code
fn renamed_city(name: &str, location_id: &str, site_code: &str) -> LocationStub {
    LocationStub::new(name, site_code, "city", "county11", location_id, 0).unwrap()
}

/// SCENARIO: drop a leaf type together with its only location
#[test]
fn scenario_delete_leaf_type_and_location() {
    let mut store = seeded_store();
    let mut types = flat_types();
    types.push(type_stub("district", "city"));
    let mut locations = basic_tree();
    locations.push(loc("D1", "d1", "district", "city111"));
    assert!(import(&mut store, types, locations).success());

    let mut types = flat_types();
    types.push(type_stub("district", "city").marked_for_delete());
    let mut locations = basic_tree();
    locations.push(loc("D1", "d1", "district", "city111").marked_for_delete());

    let first = import(&mut store, types.clone(), locations.clone());
    assert!(first.success(), "{:?}", first.errors);
    assert_eq!(first.summary.types_deleted, 1);
    assert_eq!(first.summary.locations_deleted, 1);
    assert!(store.get_type(TENANT, "district").unwrap().is_none());

    let writes = store.write_count();
    let again = import(&mut store, types, locations);
    assert!(again.success(), "{:?}", again.errors);
    assert_eq!(again.warnings.len(), 1);
    assert_eq!(again.summary.written_count(), 0);
    assert_eq!(store.write_count(), writes);
    assert_tree(&store, &as_pairs(&basic_tree()));
}

/// SCENARIO: a county changes state
#[test]
fn scenario_move_county_to_other_state() {
    let mut store = seeded_store();
    let moved: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "county21" => loc("County21", "county21", "county", "s1"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), moved.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.locations_updated, 1);
    assert_tree(&store, &as_pairs(&moved));
}

/// SCENARIO: two counties trade parents
#[test]
fn scenario_swap_parents() {
    let mut store = seeded_store();
    let swapped: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "county11" => loc("County11", "county11", "county", "s2"),
            "county21" => loc("County21", "county21", "county", "s1"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), swapped.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_tree(&store, &as_pairs(&swapped));
}

/// SCENARIO: reverse the whole type hierarchy
#[test]
fn scenario_rearrange_locations() {
    let mut store = seeded_store();
    let reversed_types = vec![
        type_stub("state", "county"),
        type_stub("county", "city"),
        type_stub("city", ""),
    ];
    let rearranged = vec![
        loc("S1", "s1", "state", "county11"),
        loc("S2", "s2", "state", "county11"),
        loc("County11", "county11", "county", "city111"),
        loc("County21", "county21", "county", "city111"),
        loc("City111", "city111", "city", ""),
        loc("City112", "city112", "city", ""),
        loc("City211", "city211", "city", "county21").marked_for_delete(),
    ];

    let result = import(&mut store, reversed_types, rearranged.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(
        store.get_type(TENANT, "state").unwrap().unwrap().parent_code.as_deref(),
        Some("county")
    );
    assert!(store.get_type(TENANT, "city").unwrap().unwrap().parent_code.is_none());
    assert_tree(&store, &as_pairs(&rearranged));
}

/// SCENARIO: rows that only carry location_id
#[test]
fn scenario_edit_by_location_id() {
    let mut store = seeded_store();
    let s1 = location_id(&store, "s1");
    let city112 = location_id(&store, "city112");

    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "s1" => loc_by_id("State One", &s1, "state", ""),
            "city112" => loc_by_id("City112", &city112, "city", "county21"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations);

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.locations_updated, 2);
    let state = store.get_location(TENANT, &s1).unwrap().unwrap();
    assert_eq!(state.name, "State One");
    assert_eq!(state.site_code, "s1");
    assert_eq!(
        store.get_location(TENANT, &city112).unwrap().unwrap().parent_id,
        Some(location_id(&store, "county21"))
    );
}

/// SCENARIO: one city takes over the site code another city gives up
#[test]
fn scenario_rename_chain() {
    let mut store = seeded_store();
    let city111 = location_id(&store, "city111");
    let city112 = location_id(&store, "city112");
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "city111" => renamed_city("City111", &city111, "city999"),
            "city112" => renamed_city("City112", &city112, "city111"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.locations_updated, 2);
    assert_eq!(store.get_location(TENANT, &city111).unwrap().unwrap().site_code, "city999");
    assert_eq!(store.get_location(TENANT, &city112).unwrap().unwrap().site_code, "city111");
    assert_tree(&store, &as_pairs(&locations));
}

/// SCENARIO: two cities trade site codes
#[test]
fn scenario_swap_site_codes() {
    let mut store = seeded_store();
    let city111 = location_id(&store, "city111");
    let city112 = location_id(&store, "city112");
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "city111" => renamed_city("City111", &city111, "city112"),
            "city112" => renamed_city("City112", &city112, "city111"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(store.get_location(TENANT, &city111).unwrap().unwrap().site_code, "city112");
    assert_eq!(store.get_location(TENANT, &city112).unwrap().unwrap().site_code, "city111");
    assert_tree(&store, &as_pairs(&locations));

    let writes = store.write_count();
    let again = import(&mut store, flat_types(), locations);
    assert_eq!(again.summary.written_count(), 0);
    assert_eq!(store.write_count(), writes);
}

/// SCENARIO: remove a county with all its cities
#[test]
fn scenario_delete_county_subtree() {
    let mut store = seeded_store();
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "county11" | "city111" | "city112" => l.marked_for_delete(),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.locations_deleted, 3);
    assert_tree(&store, &as_pairs(&locations));
}

/// SCENARIO: deleting a county but keeping one of its cities
#[test]
fn scenario_orphaning_a_city_is_rejected() {
    let mut store = seeded_store();
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "county11" | "city111" => l.marked_for_delete(),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations);

    assert_eq!(
        result.errors,
        vec!["Location 'city112' does not have a parent set or its parent is being deleted"]
    );
    assert_tree(&store, &as_pairs(&basic_tree()));
}

/// SCENARIO: tear everything down
#[test]
fn scenario_delete_everything() {
    let mut store = seeded_store();
    let types = flat_types()
        .into_iter()
        .map(|t| t.marked_for_delete())
        .collect();
    let locations = basic_tree()
        .into_iter()
        .map(|l| l.marked_for_delete())
        .collect();

    let result = import(&mut store, types, locations);

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.types_deleted, 3);
    assert_eq!(result.summary.locations_deleted, 7);
    assert!(store.list_types(TENANT).unwrap().is_empty());
    assert!(store.list_locations(TENANT).unwrap().is_empty());
}

/// SCENARIO: a brand-new top-level type above the existing tree
#[test]
fn scenario_new_root_type() {
    let mut store = seeded_store();
    let types = vec![
        type_stub("country", ""),
        type_stub("state", "country"),
        type_stub("county", "state"),
        type_stub("city", "county"),
    ];
    let mut locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "s1" => loc("S1", "s1", "state", "usa"),
            "s2" => loc("S2", "s2", "state", "usa"),
            _ => l,
        })
        .collect();
    locations.push(loc("USA", "usa", "country", ""));

    let result = import(&mut store, types, locations.clone());

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(result.summary.types_created, 1);
    assert_eq!(result.summary.types_updated, 1);
    assert_tree(&store, &as_pairs(&locations));
}

/// SCENARIO: the same tree twice in a fresh store
#[test]
fn scenario_second_identical_upload_is_a_no_op() {
    let mut store = InMemoryTreeStore::new();
    assert!(import(&mut store, flat_types(), basic_tree()).success());
    let before = store.trees();
    let writes = store.write_count();

    let result = import(&mut store, flat_types(), basic_tree());

    assert!(result.success());
    assert_eq!(result.summary.written_count(), 0);
    assert_eq!(store.write_count(), writes);
    assert_eq!(store.trees(), before);
}
