//! Test fixtures - reusable trees and builders.

use std::collections::BTreeSet;

use locsync::application::{ImportOptions, ImportResult, NewLocationImporter, Sheet, Workbook};
use locsync::domain::entities::{LocationStub, LocationTypeStub};
use locsync::domain::value_objects::{Row, TreeRef};
use locsync::infrastructure::InMemoryTreeStore;
use locsync::TreeStore;

pub const TENANT: &str = "test-bulk-management";

pub fn type_stub(code: &str, parent: &str) -> LocationTypeStub {
    LocationTypeStub::new(code, code, TreeRef::from_code(Some(parent)), 0)
}

pub fn loc(name: &str, site_code: &str, location_type: &str, parent: &str) -> LocationStub {
    LocationStub::new(name, site_code, location_type, parent, "", 0).unwrap()
}

pub fn loc_by_id(name: &str, location_id: &str, location_type: &str, parent: &str) -> LocationStub {
    LocationStub::new(name, "", location_type, parent, location_id, 0).unwrap()
}

/// state > county > city
pub fn flat_types() -> Vec<LocationTypeStub> {
    vec![
        type_stub("state", ""),
        type_stub("county", "state"),
        type_stub("city", "county"),
    ]
}

/// Two states, a county each, three cities
pub fn basic_tree() -> Vec<LocationStub> {
    vec![
        loc("S1", "s1", "state", ""),
        loc("S2", "s2", "state", ""),
        loc("County11", "county11", "county", "s1"),
        loc("County21", "county21", "county", "s2"),
        loc("City111", "city111", "city", "county11"),
        loc("City112", "city112", "city", "county11"),
        loc("City211", "city211", "city", "county21"),
    ]
}

pub fn import(
    store: &mut InMemoryTreeStore,
    types: Vec<LocationTypeStub>,
    locations: Vec<LocationStub>,
) -> ImportResult {
    NewLocationImporter::new(store, types, locations)
        .run(&ImportOptions::new(TENANT))
        .unwrap()
}

/// Store holding `flat_types` and `basic_tree`
pub fn seeded_store() -> InMemoryTreeStore {
    let mut store = InMemoryTreeStore::new();
    let result = import(&mut store, flat_types(), basic_tree());
    assert!(result.success(), "seeding failed: {:?}", result.errors);
    store
}

/// (site_code, parent site_code) of every non-deleted stub
pub fn as_pairs(locations: &[LocationStub]) -> BTreeSet<(String, Option<String>)> {
    locations
        .iter()
        .filter(|l| !l.do_delete)
        .map(|l| {
            (
                l.site_code().to_string(),
                l.parent_code.code().map(str::to_string),
            )
        })
        .collect()
}

/// (site_code, parent site_code) of every stored location
pub fn stored_pairs(store: &InMemoryTreeStore) -> BTreeSet<(String, Option<String>)> {
    let locations = store.list_locations(TENANT).unwrap();
    locations
        .iter()
        .map(|l| {
            let parent = l.parent_id.as_ref().and_then(|id| {
                locations
                    .iter()
                    .find(|p| &p.location_id == id)
                    .map(|p| p.site_code.clone())
            });
            (l.site_code.clone(), parent)
        })
        .collect()
}

pub fn location_id(store: &InMemoryTreeStore, site_code: &str) -> String {
    store
        .list_locations(TENANT)
        .unwrap()
        .into_iter()
        .find(|l| l.site_code == site_code)
        .map(|l| l.location_id)
        .unwrap_or_else(|| panic!("no stored location '{}'", site_code))
}

/// The stored tree matches `expected` and its hierarchy index agrees
pub fn assert_tree(store: &InMemoryTreeStore, expected: &BTreeSet<(String, Option<String>)>) {
    assert_eq!(&stored_pairs(store), expected);

    for (site_code, _) in expected {
        let mut want = BTreeSet::new();
        let mut frontier = vec![site_code.clone()];
        while let Some(parent) = frontier.pop() {
            for (child, p) in expected {
                if p.as_deref() == Some(parent.as_str()) && want.insert(child.clone()) {
                    frontier.push(child.clone());
                }
            }
        }

        let id = location_id(store, site_code);
        let got: BTreeSet<String> = store
            .descendants_of(TENANT, &id)
            .into_iter()
            .filter_map(|d| {
                store
                    .get_location(TENANT, &d)
                    .unwrap()
                    .map(|l| l.site_code)
            })
            .collect();
        assert_eq!(got, want, "descendants of '{}'", site_code);
    }
}

const TYPE_HEADERS: [&str; 6] = [
    "name",
    "code",
    "parent_code",
    "do_delete",
    "shares_cases",
    "view_descendants",
];

const LOCATION_HEADERS: [&str; 8] = [
    "location_id",
    "site_code",
    "name",
    "parent_site_code",
    "external_id",
    "latitude",
    "longitude",
    "do_delete",
];

/// `types` sheet from (code, parent_code) pairs
pub fn types_sheet(types: &[(&str, &str)]) -> Sheet {
    types.iter().fold(Sheet::new("types", TYPE_HEADERS), |sheet, (code, parent)| {
        sheet.with_row(
            Row::new()
                .with("name", *code)
                .with("code", *code)
                .with("parent_code", *parent)
                .with("do_delete", "")
                .with("shares_cases", "")
                .with("view_descendants", ""),
        )
    })
}

/// Locations sheet from (name, site_code, parent_site_code, do_delete)
pub fn location_sheet(code: &str, rows: &[(&str, &str, &str, bool)]) -> Sheet {
    rows.iter().fold(
        Sheet::new(code, LOCATION_HEADERS),
        |sheet, (name, site_code, parent, delete)| {
            sheet.with_row(
                Row::new()
                    .with("location_id", "")
                    .with("site_code", *site_code)
                    .with("name", *name)
                    .with("parent_site_code", *parent)
                    .with("external_id", "")
                    .with("latitude", "")
                    .with("longitude", "")
                    .with("do_delete", if *delete { "yes" } else { "" }),
            )
        },
    )
}

/// Workbook for `flat_types` and `basic_tree`
pub fn basic_workbook() -> Workbook {
    Workbook::new()
        .with_sheet(types_sheet(&[("state", ""), ("county", "state"), ("city", "county")]))
        .with_sheet(location_sheet(
            "state",
            &[("S1", "s1", "", false), ("S2", "s2", "", false)],
        ))
        .with_sheet(location_sheet(
            "county",
            &[
                ("County11", "county11", "s1", false),
                ("County21", "county21", "s2", false),
            ],
        ))
        .with_sheet(location_sheet(
            "city",
            &[
                ("City111", "city111", "county11", false),
                ("City112", "city112", "county11", false),
                ("City211", "city211", "county21", false),
            ],
        ))
}
