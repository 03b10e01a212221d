//! Scenario: A tenant with no locations uploads its first tree
//!
//! Journey:
//! 1. Validate the upload without any prior state
//! 2. Commit it
//! 3. Fix a bad parent reference the validator caught
//!
//! Success Criteria:
//! - A well-formed upload validates clean and is created top-down
//! - Bad rows are reported before anything is written

use crate::common::*;

use locsync::application::{
    parse_workbook, ImportOptions, NewLocationImporter, WorkbookError,
};
use locsync::domain::entities::{LocationCollection, LocationStub, RowFormatError};
use locsync::domain::ports::{NoopEventSink, TreeStore};
use locsync::domain::value_objects::Row;
use locsync::infrastructure::InMemoryTreeStore;
use locsync::{LocationTypeStub, TreeRef, TreeValidator, Workbook};

fn state_county_types() -> Vec<LocationTypeStub> {
    vec![
        LocationTypeStub::new("state", "state", TreeRef::Root, 0),
        LocationTypeStub::new("county", "county", TreeRef::code_of("state"), 1)
            .with_flags(false, true),
    ]
}

fn mass_and_suffolk() -> Vec<LocationStub> {
    vec![
        LocationStub::new("Massachusetts", "mass", "state", "", "MA1", 0).unwrap(),
        LocationStub::new("Suffolk", "suffolk", "county", "mass", "SF1", 0).unwrap(),
    ]
}

/// SCENARIO: a state and a county with caller-chosen ids
#[test]
fn scenario_first_upload_validates_and_commits() {
    let validator = TreeValidator::new(state_county_types(), mass_and_suffolk(), None).unwrap();
    assert!(validator.errors().is_empty(), "{:?}", validator.errors());
    let (types, locations) = validator.into_stubs();

    let mut store = InMemoryTreeStore::new();
    let snapshot = LocationCollection::default();
    let options = ImportOptions::new(TENANT);
    let mut importer = NewLocationImporter::new(&mut store, Vec::new(), Vec::new());

    importer.store_mut().begin().unwrap();
    let summary = importer
        .commit_changes(&snapshot, &types, &locations, &options, &NoopEventSink)
        .unwrap();
    importer.store_mut().commit().unwrap();

    assert_eq!(summary.types_created, 2);
    assert_eq!(summary.locations_created, 2);
    let suffolk = store.get_location(TENANT, "SF1").unwrap().unwrap();
    assert_eq!(suffolk.parent_id.as_deref(), Some("MA1"));
    assert_eq!(suffolk.location_type, "county");
    assert!(store.get_type(TENANT, "county").unwrap().unwrap().view_descendants);
}

/// SCENARIO: a county pointing at a parent nobody listed
#[test]
fn scenario_unknown_parent_is_reported() {
    let mut locations = mass_and_suffolk();
    locations.push(
        LocationStub::new("Middlesex", "middlesex", "county", "nonexistent", "MX1", 1).unwrap(),
    );

    let validator = TreeValidator::new(state_county_types(), locations, None).unwrap();

    assert_eq!(validator.errors().len(), 1);
    assert!(validator.errors()[0]
        .contains("does not have a parent set or its parent is being deleted"));
}

/// SCENARIO: a row with neither location_id nor site_code
#[test]
fn scenario_row_without_identity_fails_at_parse_time() {
    let err = LocationStub::new("Nameless", "", "state", "", "", 3).unwrap_err();
    assert_eq!(
        err,
        RowFormatError::MissingIdentity {
            sheet: "state".to_string(),
            index: 3,
        }
    );

    let mut workbook = basic_workbook();
    let state = workbook
        .sheets
        .iter_mut()
        .find(|s| s.title == "state")
        .unwrap();
    state.rows.push(
        Row::new()
            .with("location_id", "")
            .with("site_code", "  ")
            .with("name", "Nameless")
            .with("parent_site_code", "")
            .with("external_id", "")
            .with("latitude", "")
            .with("longitude", "")
            .with("do_delete", ""),
    );
    assert!(matches!(
        parse_workbook(&workbook),
        Err(WorkbookError::Row(RowFormatError::MissingIdentity { index: 2, .. }))
    ));
}

/// SCENARIO: the whole journey through a workbook
#[test]
fn scenario_workbook_upload_creates_tree() {
    let mut store = InMemoryTreeStore::new();

    let result = NewLocationImporter::from_workbook(&mut store, &basic_workbook())
        .unwrap()
        .run(&ImportOptions::new(TENANT))
        .unwrap();

    assert!(result.success(), "{:?}", result.errors);
    assert_eq!(
        result.messages,
        vec![
            "Created 3 new location types",
            "Updated 0 existing location types",
            "Deleted 0 existing location types",
            "Created 7 new locations",
            "Updated 0 existing locations",
            "Deleted 0 existing locations",
        ]
    );
    assert_tree(&store, &as_pairs(&basic_tree()));
}

/// SCENARIO: a workbook missing a sheet for one of its types
#[test]
fn scenario_missing_sheet_is_a_single_error() {
    let workbook = Workbook::new()
        .with_sheet(types_sheet(&[("state", ""), ("county", "state")]))
        .with_sheet(location_sheet("state", &[("S1", "s1", "", false)]));

    let err = NewLocationImporter::from_workbook(InMemoryTreeStore::new(), &workbook)
        .err()
        .unwrap();

    assert_eq!(err.to_string(), "Location type 'county' has no locations sheet");
}
