//! Import and validate command handlers

use std::sync::Arc;

use anyhow::Result;

use locsync::application::{ImportError, ImportOptions, ImportResult, NewLocationImporter};
use locsync::config::Config;
use locsync::domain::ports::ImportEventSink;
use locsync::infrastructure::{
    JsonEventSink, JsonWorkbookReader, TenantLock, TomlTreeStore, TracingEventSink,
};
use locsync::{LocsyncError, LocsyncResult};

use crate::cli::TargetArgs;

/// Execute the import command
pub fn cmd_import(config: &Config, target: &TargetArgs, dry_run: bool, json: bool) -> Result<()> {
    let result = run_import(config, target, dry_run, json)?;
    finish(&result, json)
}

/// Execute the validate command (an import that never writes)
pub fn cmd_validate(config: &Config, target: &TargetArgs, json: bool) -> Result<()> {
    let result = run_import(config, target, true, json)?;
    finish(&result, json)
}

fn run_import(
    config: &Config,
    target: &TargetArgs,
    dry_run: bool,
    json: bool,
) -> LocsyncResult<ImportResult> {
    let tenant = target
        .tenant
        .clone()
        .or_else(|| config.import.tenant.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or(LocsyncError::MissingTenant)?;
    let store_path = target.store.clone().unwrap_or_else(|| config.store_path());

    let workbook = JsonWorkbookReader::read_path(&target.workbook)?;

    let _lock = if dry_run {
        None
    } else {
        Some(TenantLock::acquire(&store_path, &tenant)?)
    };
    let store = TomlTreeStore::open(&store_path)?;

    let mut importer = match NewLocationImporter::from_workbook(store, &workbook) {
        Ok(importer) => importer,
        Err(err) => return Ok(rejected(err, dry_run)),
    };

    let options = ImportOptions::new(tenant)
        .with_dry_run(dry_run)
        .with_data_model(config.data_model.to_model());
    let sink: Arc<dyn ImportEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(TracingEventSink::new().detailed(tracing::enabled!(tracing::Level::DEBUG)))
    };

    match importer.run_with_events(&options, sink) {
        Ok(result) => Ok(result),
        Err(ImportError::Row(err)) => Ok(rejected(err, dry_run)),
        Err(err) => Err(err.into()),
    }
}

/// A malformed upload is reported like any validation error
fn rejected(err: impl ToString, dry_run: bool) -> ImportResult {
    ImportResult {
        dry_run,
        ..ImportResult::from_error(err)
    }
}

fn finish(result: &ImportResult, json: bool) -> Result<()> {
    if json {
        let line = serde_json::json!({
            "event": "result",
            "command": "import",
            "success": result.success(),
            "dry_run": result.dry_run,
            "errors": result.errors,
            "warnings": result.warnings,
            "messages": result.messages,
        });
        println!("{}", line);
    } else {
        print_report(result);
    }

    if !result.success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(result: &ImportResult) {
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &result.errors {
        eprintln!("error: {}", error);
    }
    if !result.success() {
        eprintln!(
            "Upload rejected with {} error(s); nothing was written.",
            result.errors.len()
        );
        return;
    }

    if result.dry_run {
        println!("Dry run, nothing was written. Planned changes:");
    }
    for message in &result.messages {
        println!("{}", message);
    }
}
