//! Scenario: An upload with structural problems
//!
//! Journey: the user uploads a tree with a looping type hierarchy or
//! clashing site codes, reads the itemized errors, and nothing changes.

use crate::common::*;

use std::collections::BTreeSet;

use locsync::domain::services::{assert_acyclic, TreeError};
use locsync::infrastructure::InMemoryTreeStore;
use locsync::{TreeRef, TreeStore, TreeValidator};

/// SCENARIO: two types naming each other as parent
#[test]
fn scenario_mutual_parentage_is_one_error_per_type() {
    let edges = vec![
        ("a".to_string(), TreeRef::code_of("b")),
        ("b".to_string(), TreeRef::code_of("a")),
    ];
    let expected: BTreeSet<String> = ["a", "b"].into_iter().map(String::from).collect();
    assert_eq!(
        assert_acyclic(&edges),
        Err(TreeError::Cycle { affected: expected })
    );

    let validator = TreeValidator::new(
        vec![type_stub("a", "b"), type_stub("b", "a")],
        Vec::new(),
        None,
    )
    .unwrap();
    insta::assert_debug_snapshot!(validator.errors(), @r###"
    [
        "Location Type 'a' has a parentage that loops",
        "Location Type 'b' has a parentage that loops",
    ]
    "###);
}

/// SCENARIO: two rows sharing a site code
#[test]
fn scenario_duplicate_site_code_blocks_commit() {
    let mut store = seeded_store();
    let before = store.trees();
    let writes = store.write_count();

    let mut locations = basic_tree();
    locations.push(loc("Dup A", "dup", "city", "county11"));
    locations.push(loc("Dup B", "dup", "city", "county21"));

    let result = import(&mut store, flat_types(), locations);

    assert_eq!(
        result.errors,
        vec!["Location site_code 'dup' is used 2 times - they should be unique"]
    );
    assert_eq!(store.trees(), before);
    assert_eq!(store.write_count(), writes);
}

/// SCENARIO: moving a county under a location of the wrong type
#[test]
fn scenario_wrong_parent_type_is_reported() {
    let mut store = seeded_store();
    let locations: Vec<_> = basic_tree()
        .into_iter()
        .map(|l| match l.site_code() {
            "county21" => loc("County21", "county21", "county", "county11"),
            _ => l,
        })
        .collect();

    let result = import(&mut store, flat_types(), locations);

    assert_eq!(
        result.errors,
        vec!["Location 'county21' is a 'county', so it should have a parent that is a 'state'"]
    );
}

/// SCENARIO: deleting a type that still has locations
#[test]
fn scenario_type_delete_with_live_locations_is_rejected() {
    let mut store = seeded_store();
    let types = vec![
        type_stub("state", ""),
        type_stub("county", "state"),
        type_stub("city", "county").marked_for_delete(),
    ];

    let result = import(&mut store, types, basic_tree());

    assert_eq!(result.errors.len(), 3);
    assert!(result
        .errors
        .iter()
        .all(|e| e.contains("points to a nonexistent or to be deleted location-type 'city'")));
    assert!(store.get_type(TENANT, "city").unwrap().is_some());
}

/// SCENARIO: siblings with the same name
#[test]
fn scenario_same_name_same_parent() {
    let mut store = InMemoryTreeStore::new();
    let mut locations = basic_tree();
    locations.push(loc("City111", "city113", "city", "county11"));

    let result = import(&mut store, flat_types(), locations);

    assert_eq!(
        result.errors,
        vec!["There are 2 locations with the name 'City111' under the parent 'county11'"]
    );
    assert_eq!(store.write_count(), 0);
}
