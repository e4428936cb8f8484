//! JSON file adapters for the engine ports
//!
//! Claim histories and plans are read eagerly when an adapter is opened.
//! A source path may be a single JSON file or a directory of `*.json`
//! files; results are appended to a JSON-lines file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use core_kernel::{DomainPort, PersonId, PortError};
use domain_benefits::{Plan, PlanCatalogPort};
use domain_claims::{
    ClaimHistoryPort, CostMapItem, CostResultPort, PersonClaims, PlanBreakdown, ProrationResult,
};

// A file holds either one record or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PortError> {
    let text = fs::read_to_string(path)
        .map_err(|e| PortError::connection(format!("reading {}", path.display()), e))?;
    let parsed: OneOrMany<T> = serde_json::from_str(&text)
        .map_err(|e| PortError::validation(format!("{}: {e}", path.display())))?;
    Ok(match parsed {
        OneOrMany::Many(records) => records,
        OneOrMany::One(record) => vec![record],
    })
}

fn read_json_source<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PortError> {
    if !path.is_dir() {
        return read_json_file(path);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| PortError::connection(format!("listing {}", path.display()), e))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|file| file.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut records = Vec::new();
    for file in &files {
        records.extend(read_json_file(file)?);
    }
    Ok(records)
}

/// Claim histories read from JSON
#[derive(Debug, Clone, Default)]
pub struct JsonClaimHistory {
    people: BTreeMap<PersonId, PersonClaims>,
}

impl JsonClaimHistory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        let history = Self::from_records(read_json_source(path)?);
        info!(path = %path.display(), people = history.people.len(), "Loaded claim histories");
        Ok(history)
    }

    /// Builds the history from parsed records
    ///
    /// Claims are put in admission order. Records for the same person are
    /// merged.
    pub fn from_records(records: Vec<PersonClaims>) -> Self {
        let mut people: BTreeMap<PersonId, PersonClaims> = BTreeMap::new();
        for record in records {
            people
                .entry(record.person_id.clone())
                .or_insert_with(|| PersonClaims {
                    person_id: record.person_id.clone(),
                    medical_claims: Vec::new(),
                })
                .medical_claims
                .extend(record.medical_claims);
        }
        for person in people.values_mut() {
            person.medical_claims.sort_by_key(|claim| claim.admitted);
        }
        Self { people }
    }

    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.keys().cloned().collect()
    }
}

impl DomainPort for JsonClaimHistory {}

impl ClaimHistoryPort for JsonClaimHistory {
    fn person_claims(&self, person_id: &PersonId) -> Result<PersonClaims, PortError> {
        self.people
            .get(person_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("PersonClaims", person_id))
    }
}

/// Plan catalog read from JSON
#[derive(Debug, Clone, Default)]
pub struct JsonPlanCatalog {
    plans: Vec<Plan>,
}

impl JsonPlanCatalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        let plans: Vec<Plan> = read_json_source(path)?;
        info!(path = %path.display(), plans = plans.len(), "Loaded plan catalog");
        Ok(Self { plans })
    }

    pub fn from_plans(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

impl DomainPort for JsonPlanCatalog {}

impl PlanCatalogPort for JsonPlanCatalog {
    fn all_plans(&self) -> Result<Vec<Plan>, PortError> {
        Ok(self.plans.clone())
    }
}

/// Appends results to a JSON-lines file, one record per line
#[derive(Debug)]
pub struct JsonLinesResultWriter {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesResultWriter {
    /// Creates the file (and its parent directories), truncating any previous output
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PortError::connection(format!("creating {}", parent.display()), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| PortError::connection(format!("opening {}", path.display()), e))?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_lines<T: Serialize>(&self, records: &[T]) -> Result<(), PortError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| PortError::internal("result writer lock poisoned"))?;

        for record in records {
            serde_json::to_writer(&mut *writer, record)
                .map_err(|e| PortError::transformation(e.to_string()))?;
            writer
                .write_all(b"\n")
                .map_err(|e| PortError::connection(format!("writing {}", self.path.display()), e))?;
        }
        writer
            .flush()
            .map_err(|e| PortError::connection(format!("flushing {}", self.path.display()), e))?;

        debug!(path = %self.path.display(), records = records.len(), "Wrote results");
        Ok(())
    }
}

impl DomainPort for JsonLinesResultWriter {}

impl CostResultPort for JsonLinesResultWriter {
    fn write_cost_map(&self, items: &[CostMapItem]) -> Result<(), PortError> {
        self.write_lines(items)
    }

    fn write_breakdowns(&self, breakdowns: &[PlanBreakdown]) -> Result<(), PortError> {
        self.write_lines(breakdowns)
    }

    fn write_proration(&self, results: &[ProrationResult]) -> Result<(), PortError> {
        self.write_lines(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_record_or_array() {
        let one: OneOrMany<PersonClaims> =
            serde_json::from_value(json!({ "uid": "1", "medical_claims": [] })).unwrap();
        assert!(matches!(one, OneOrMany::One(_)));

        let many: OneOrMany<PersonClaims> =
            serde_json::from_value(json!([{ "person_id": "1" }, { "person_id": "2" }])).unwrap();
        assert!(matches!(many, OneOrMany::Many(ref people) if people.len() == 2));
    }

    #[test]
    fn test_unknown_person_is_not_found() {
        let history = JsonClaimHistory::default();
        let error = history.person_claims(&PersonId::new("missing")).unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_unknown_plan_is_not_found() {
        let catalog = JsonPlanCatalog::default();
        let error = catalog
            .plans_by_id(&[core_kernel::PlanId::new("H9999-999-9")])
            .unwrap_err();
        assert!(error.is_not_found());
    }
}
