//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use census_model::{Person, PersonId};
use census_store::PersonStore;
use census_validate::{RecordValidation, SystemClock, validate};

use crate::cli::{AddArgs, DataDirArgs, ExportArgs, RecordArgs, ServeArgs, ValidateArgs};

/// Result of `census add`: the validation outcome, plus the stored id when
/// the record was accepted.
pub struct AddOutcome {
    pub validation: RecordValidation,
    pub id: Option<PersonId>,
}

/// Validate a candidate file against the full rule set.
pub fn run_validate(args: &ValidateArgs) -> Result<RecordValidation> {
    validate_file(&args.file)
}

/// Validate a candidate file and store it when clean.
pub fn run_add(args: &AddArgs) -> Result<AddOutcome> {
    let validation = validate_file(&args.file)?;
    let Some(person) = validation.record.clone() else {
        return Ok(AddOutcome {
            validation,
            id: None,
        });
    };
    let store = PersonStore::open(&args.data_dir)?;
    let id = store.create(&person)?;
    Ok(AddOutcome {
        validation,
        id: Some(id),
    })
}

/// List every stored record.
pub fn run_list(args: &DataDirArgs) -> Result<Vec<Person>> {
    let store = PersonStore::open(&args.data_dir)?;
    Ok(store.list()?)
}

/// Fetch one stored record.
pub fn run_show(args: &RecordArgs) -> Result<Person> {
    let id = parse_id(&args.id)?;
    let store = PersonStore::open(&args.data_dir)?;
    Ok(store.find_by_id(&id)?)
}

/// Remove one stored record.
pub fn run_remove(args: &RecordArgs) -> Result<PersonId> {
    let id = parse_id(&args.id)?;
    let store = PersonStore::open(&args.data_dir)?;
    store.delete(&id)?;
    Ok(id)
}

/// Export the store as flat CSV. Returns the number of exported records.
pub fn run_export(args: &ExportArgs) -> Result<usize> {
    let store = PersonStore::open(&args.data_dir)?;
    let people = store.list()?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    writer.write_record([
        "id",
        "name",
        "lastName",
        "nationalId",
        "dateOfBirth",
        "gender",
        "hasTaxId",
        "taxId",
        "hasFarm",
        "farmAreaHectares",
        "farmName",
        "crops",
        "familyMembers",
        "hasWorkers",
        "totalWorkers",
        "menWorkers",
        "womenWorkers",
        "over18Workers",
        "under18Workers",
        "minorWorkersOccupation",
        "hasPregnantWorkers",
        "pregnantWorkers",
        "pregnantWorkersOccupation",
    ])?;
    for person in &people {
        writer.write_record([
            opt(&person.id),
            person.name.clone(),
            person.last_name.clone(),
            person.national_id.clone(),
            person.date_of_birth.to_string(),
            person.gender.to_string(),
            person.has_tax_id.to_string(),
            opt(&person.tax_id),
            person.has_farm.to_string(),
            opt(&person.farm_area_hectares),
            opt(&person.farm_name),
            person.crops.join(";"),
            person.family.len().to_string(),
            person.has_workers.to_string(),
            opt(&person.total_workers),
            opt(&person.men_workers),
            opt(&person.women_workers),
            opt(&person.over18_workers),
            opt(&person.under18_workers),
            opt(&person.minor_workers_occupation),
            person.has_pregnant_workers.to_string(),
            opt(&person.pregnant_workers),
            opt(&person.pregnant_workers_occupation),
        ])?;
    }
    writer.flush()?;
    tracing::info!(
        count = people.len(),
        output = %args.output.display(),
        "exported records"
    );
    Ok(people.len())
}

/// Run the HTTP API until interrupted.
pub fn run_serve(args: &ServeArgs) -> Result<()> {
    let store = PersonStore::open(&args.data_dir)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(census_api::serve(args.addr, store))
        .context("api server failed")?;
    Ok(())
}

fn validate_file(path: &Path) -> Result<RecordValidation> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let candidate: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let outcome = validate(&candidate, &SystemClock)
        .with_context(|| format!("{} does not contain a record", path.display()))?;
    Ok(outcome)
}

fn parse_id(raw: &str) -> Result<PersonId> {
    raw.parse()
        .with_context(|| format!("{raw} is not a valid record id"))
}

fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}
