//! New Location Importer
//!
//! Orchestrates one reconciliation run:
//! 1. Load a snapshot of the tenant's tree
//! 2. Validate the stubs against it
//! 3. Inside one transaction, write types then locations top-down, then
//!    delete bottom-up, then rebuild the hierarchy indices
//!
//! Any store failure during step 3, including a failed commit, rolls the
//! whole transaction back.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::entities::{
    LocationCollection, LocationRecord, LocationStub, LocationTypeStub, TypeRecord,
};
use crate::domain::ports::{ImportEvent, ImportEventSink, NoopEventSink, TreeStore};
use crate::domain::services::{Planner, TreeValidator};
use crate::domain::value_objects::{RecordAction, TreeRef};

use crate::application::workbook::{parse_workbook, Workbook, WorkbookError};

use super::options::ImportOptions;
use super::result::{CommitError, ImportError, ImportResult, ImportSummary};

/// Import use case - reconciles a tenant's tree with an upload
///
/// The caller must hold exclusive write access to the tenant's tree for the
/// duration of [`run`](Self::run).
pub struct NewLocationImporter<S: TreeStore> {
    store: S,
    types: Vec<LocationTypeStub>,
    locations: Vec<LocationStub>,
}

impl<S: TreeStore> NewLocationImporter<S> {
    pub fn new(store: S, types: Vec<LocationTypeStub>, locations: Vec<LocationStub>) -> Self {
        Self {
            store,
            types,
            locations,
        }
    }

    /// Build an importer from a workbook, checking its format first
    pub fn from_workbook(store: S, workbook: &Workbook) -> Result<Self, WorkbookError> {
        let parsed = parse_workbook(workbook)?;
        Ok(Self::new(store, parsed.types, parsed.locations))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store access for callers driving `commit_changes` themselves
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Run the import silently
    pub fn run(&mut self, options: &ImportOptions) -> Result<ImportResult, ImportError> {
        self.run_with_events(options, Arc::new(NoopEventSink))
    }

    /// Run the import, reporting progress to `event_sink`
    pub fn run_with_events(
        &mut self,
        options: &ImportOptions,
        event_sink: Arc<dyn ImportEventSink>,
    ) -> Result<ImportResult, ImportError> {
        let tenant = options.tenant.as_str();
        event_sink.on_event(ImportEvent::Started {
            tenant: tenant.to_string(),
            type_count: self.types.len(),
            location_count: self.locations.len(),
        });

        let snapshot =
            LocationCollection::load(&self.store, tenant).map_err(ImportError::Snapshot)?;
        let validator =
            TreeValidator::new(self.types.clone(), self.locations.clone(), Some(&snapshot))?
                .with_data_model(options.data_model.clone());

        let mut result = ImportResult {
            errors: validator.errors().to_vec(),
            warnings: validator.warnings(),
            dry_run: options.dry_run,
            ..ImportResult::default()
        };
        event_sink.on_event(ImportEvent::Validated {
            error_count: result.errors.len(),
            warning_count: result.warnings.len(),
        });

        if !result.success() {
            tracing::info!(
                tenant,
                errors = result.errors.len(),
                "upload rejected, nothing written"
            );
            return Ok(result);
        }

        let (types, locations) = validator.into_stubs();

        let summary = if options.dry_run {
            self.commit_changes(&snapshot, &types, &locations, options, event_sink.as_ref())?
        } else {
            self.store.begin().map_err(CommitError::Store)?;
            let committed = self
                .commit_changes(&snapshot, &types, &locations, options, event_sink.as_ref())
                .and_then(|summary| {
                    self.store.commit().map_err(CommitError::Store)?;
                    Ok(summary)
                });
            match committed {
                Ok(summary) => summary,
                Err(err) => {
                    tracing::warn!(tenant, error = %err, "rolling back import");
                    if let Err(rollback_err) = self.store.rollback() {
                        tracing::warn!(tenant, error = %rollback_err, "rollback failed");
                    }
                    event_sink.on_event(ImportEvent::RolledBack {
                        error: err.to_string(),
                    });
                    return Err(err.into());
                }
            }
        };

        result.summary = summary;
        result.messages = summary.messages();
        event_sink.on_event(ImportEvent::Completed {
            written_count: summary.written_count(),
            unchanged_count: summary.unchanged_count(),
            dry_run: options.dry_run,
        });
        tracing::info!(
            tenant,
            written = summary.written_count(),
            unchanged = summary.unchanged_count(),
            dry_run = options.dry_run,
            "import complete"
        );
        Ok(result)
    }

    /// Write validated stubs to the store.
    ///
    /// Types and then locations are walked from the root downward; a node is
    /// written only once its parent has been materialized. Stored locations
    /// whose site code is taken over by a rename are first parked under a
    /// placeholder code, so renames may chain or swap. Deletions are
    /// applied afterwards, deepest first, locations before types. The caller
    /// owns the transaction. With `options.dry_run` nothing is written.
    pub fn commit_changes(
        &mut self,
        snapshot: &LocationCollection,
        types: &[LocationTypeStub],
        locations: &[LocationStub],
        options: &ImportOptions,
        event_sink: &dyn ImportEventSink,
    ) -> Result<ImportSummary, CommitError> {
        let planner = Planner::new(snapshot, &options.data_model);
        let mut walk = CommitWalk {
            store: &mut self.store,
            tenant: options.tenant.as_str(),
            dry_run: options.dry_run,
            detailed: event_sink.wants_detailed_events(),
            event_sink,
            summary: ImportSummary::default(),
        };

        walk.upsert_types(&planner, types)?;
        walk.park_renamed_locations(snapshot, locations)?;
        walk.upsert_locations(&planner, locations)?;
        walk.delete_locations(&planner, snapshot, locations)?;
        walk.delete_types(&planner, snapshot, types)?;

        if !options.dry_run {
            walk.store.rebuild_hierarchy_indices(walk.tenant)?;
        }
        Ok(walk.summary)
    }
}

/// State of one commit walk
struct CommitWalk<'w, S: TreeStore> {
    store: &'w mut S,
    tenant: &'w str,
    dry_run: bool,
    detailed: bool,
    event_sink: &'w dyn ImportEventSink,
    summary: ImportSummary,
}

impl<S: TreeStore> CommitWalk<'_, S> {
    fn upsert_types(
        &mut self,
        planner: &Planner<'_>,
        types: &[LocationTypeStub],
    ) -> Result<(), CommitError> {
        let mut by_parent: HashMap<&TreeRef, Vec<&LocationTypeStub>> = HashMap::new();
        for stub in types.iter().filter(|t| !t.do_delete) {
            by_parent.entry(&stub.parent_code).or_default().push(stub);
        }

        let mut materialized: HashMap<String, TypeRecord> = HashMap::new();
        let mut pending = VecDeque::from([TreeRef::Root]);
        while let Some(parent) = pending.pop_front() {
            for stub in by_parent.get(&parent).into_iter().flatten() {
                let plan = planner.plan_type(stub);
                let Some(record) = plan.record else {
                    continue;
                };
                let record = if plan.action.is_write() && !self.dry_run {
                    self.store
                        .save_type(self.tenant, record)
                        .map_err(|source| CommitError::Type {
                            code: stub.code.clone(),
                            source,
                        })?
                } else {
                    record
                };
                self.type_done(&stub.code, plan.action);
                materialized.insert(stub.code.clone(), record);
                pending.push_back(TreeRef::code_of(stub.code.as_str()));
            }
        }

        if let Some(stub) = types
            .iter()
            .find(|t| !t.do_delete && !materialized.contains_key(&t.code))
        {
            return Err(CommitError::UnreachableType {
                code: stub.code.clone(),
            });
        }
        Ok(())
    }

    /// Free the site codes that renamed rows take over
    fn park_renamed_locations(
        &mut self,
        snapshot: &LocationCollection,
        locations: &[LocationStub],
    ) -> Result<(), CommitError> {
        if self.dry_run {
            return Ok(());
        }

        let renamed: Vec<(&LocationStub, &LocationRecord)> = locations
            .iter()
            .filter(|l| !l.do_delete && !l.is_new)
            .filter_map(|l| {
                let old = l.location_id.as_deref().and_then(|id| snapshot.location_by_id(id))?;
                Some((l, old))
            })
            .filter(|(l, old)| old.site_code.to_lowercase() != l.site_code())
            .collect();
        let taken: HashSet<&str> = renamed.iter().map(|(l, _)| l.site_code()).collect();

        for (_, old) in renamed
            .iter()
            .filter(|(_, old)| taken.contains(old.site_code.to_lowercase().as_str()))
        {
            let mut parked = LocationRecord::clone(old);
            parked.site_code = format!("~{}", old.location_id);
            tracing::debug!(site_code = %old.site_code, "parking location for rename");
            self.store
                .save_location(self.tenant, parked)
                .map_err(|source| CommitError::Location {
                    site_code: old.site_code.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn upsert_locations(
        &mut self,
        planner: &Planner<'_>,
        locations: &[LocationStub],
    ) -> Result<(), CommitError> {
        let mut by_parent: HashMap<&TreeRef, Vec<&LocationStub>> = HashMap::new();
        for stub in locations.iter().filter(|l| !l.do_delete) {
            by_parent.entry(&stub.parent_code).or_default().push(stub);
        }

        let mut materialized: HashMap<String, LocationRecord> = HashMap::new();
        let mut pending = VecDeque::from([TreeRef::Root]);
        while let Some(parent) = pending.pop_front() {
            let parent_id = parent
                .code()
                .and_then(|code| materialized.get(code))
                .map(|record| record.location_id.clone());

            for stub in by_parent.get(&parent).into_iter().flatten() {
                let plan = planner.plan_location(stub, parent_id.as_deref());
                let Some(record) = plan.record else {
                    continue;
                };
                let record = if plan.action.is_write() && !self.dry_run {
                    self.store
                        .save_location(self.tenant, record)
                        .map_err(|source| CommitError::Location {
                            site_code: stub.site_code().to_string(),
                            source,
                        })?
                } else {
                    record
                };
                self.location_done(stub.site_code(), plan.action);
                materialized.insert(stub.site_code().to_string(), record);
                pending.push_back(TreeRef::code_of(stub.site_code()));
            }
        }

        if let Some(stub) = locations
            .iter()
            .find(|l| !l.do_delete && !materialized.contains_key(l.site_code()))
        {
            return Err(CommitError::Unreachable {
                site_code: stub.site_code().to_string(),
            });
        }
        Ok(())
    }

    fn delete_locations(
        &mut self,
        planner: &Planner<'_>,
        snapshot: &LocationCollection,
        locations: &[LocationStub],
    ) -> Result<(), CommitError> {
        let mut doomed: Vec<(usize, &LocationStub, LocationRecord)> = Vec::new();
        let mut seen = HashSet::new();
        for stub in locations.iter().filter(|l| l.do_delete) {
            let plan = planner.plan_location(stub, None);
            match (plan.action, plan.record) {
                (RecordAction::Delete, Some(record)) => {
                    if seen.insert(record.location_id.clone()) {
                        doomed.push((snapshot.location_depth(&record.location_id), stub, record));
                    }
                }
                (action, _) => self.location_done(stub.site_code(), action),
            }
        }

        doomed.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, stub, record) in doomed {
            if !self.dry_run {
                self.store
                    .delete_location(self.tenant, &record.location_id)
                    .map_err(|source| CommitError::Location {
                        site_code: record.site_code.clone(),
                        source,
                    })?;
            }
            self.location_done(stub.site_code(), RecordAction::Delete);
        }
        Ok(())
    }

    fn delete_types(
        &mut self,
        planner: &Planner<'_>,
        snapshot: &LocationCollection,
        types: &[LocationTypeStub],
    ) -> Result<(), CommitError> {
        let mut doomed: Vec<(usize, TypeRecord)> = Vec::new();
        for stub in types.iter().filter(|t| t.do_delete) {
            let plan = planner.plan_type(stub);
            match (plan.action, plan.record) {
                (RecordAction::Delete, Some(record)) => {
                    doomed.push((snapshot.type_depth(&record.code), record));
                }
                (action, _) => self.type_done(&stub.code, action),
            }
        }

        doomed.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, record) in doomed {
            if !self.dry_run {
                self.store
                    .delete_type(self.tenant, &record.code)
                    .map_err(|source| CommitError::Type {
                        code: record.code.clone(),
                        source,
                    })?;
            }
            self.type_done(&record.code, RecordAction::Delete);
        }
        Ok(())
    }

    fn type_done(&mut self, code: &str, action: RecordAction) {
        self.summary.record_type(action);
        if self.detailed {
            self.event_sink.on_event(ImportEvent::TypeCommitted {
                code: code.to_string(),
                action,
            });
        }
    }

    fn location_done(&mut self, site_code: &str, action: RecordAction) {
        self.summary.record_location(action);
        if self.detailed {
            self.event_sink.on_event(ImportEvent::LocationCommitted {
                site_code: site_code.to_string(),
                action,
            });
        }
    }
}
