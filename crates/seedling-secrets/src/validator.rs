//! Secret validation utilities.
//!
//! Validation never generates or modifies anything. It exists to spot the
//! states provisioning cannot repair on its own, such as a certificate
//! directory left empty by an interrupted run.

use crate::plan::{PlanEntry, SecretPlan, SecretSource};
use crate::store::SecretsDir;
use crate::types::{ssh, x509, CertificateInfo};
use chrono::{DateTime, Duration, Utc};
use seedling_core::time::pretty_duration;
use seedling_types::{Result, SecretId, SecretKind, ValidationResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Secret validator.
#[derive(Debug, Clone)]
pub struct SecretValidator {
    now: DateTime<Utc>,
    expiry_warning: Duration,
}

impl SecretValidator {
    /// Validator that flags certificates expiring within
    /// `expiry_warning_days` of the current time.
    pub fn new(expiry_warning_days: u32) -> Self {
        Self::at(Utc::now(), expiry_warning_days)
    }

    /// Validator evaluating expiry as of `now`.
    pub fn at(now: DateTime<Utc>, expiry_warning_days: u32) -> Self {
        Self {
            now,
            expiry_warning: Duration::days(i64::from(expiry_warning_days)),
        }
    }

    /// Validate every entry of `plan` against `store`.
    pub fn validate_all(&self, plan: &SecretPlan, store: &SecretsDir) -> Result<Vec<ValidatedSecret>> {
        plan.entries()
            .iter()
            .map(|entry| {
                Ok(ValidatedSecret {
                    id: entry.id().clone(),
                    kind: entry.kind(),
                    result: self.validate_entry(entry, store)?,
                })
            })
            .collect()
    }

    /// Get summary of validation results.
    pub fn summary(&self, plan: &SecretPlan, store: &SecretsDir) -> Result<ValidationSummary> {
        let mut summary = ValidationSummary::default();

        for validated in self.validate_all(plan, store)? {
            let path = validated.id.to_string();
            match validated.result {
                ValidationResult::Ok => summary.ok.push(path),
                ValidationResult::Missing => summary.missing.push(path),
                ValidationResult::Warning(warnings) => summary.warnings.push((path, warnings)),
                ValidationResult::Error(errors) => summary.errors.push((path, errors)),
            }
        }

        Ok(summary)
    }

    /// Validate a single plan entry.
    pub fn validate_entry(&self, entry: &PlanEntry, store: &SecretsDir) -> Result<ValidationResult> {
        match entry {
            PlanEntry::Secret { id, source } => {
                let expected_length = match source {
                    SecretSource::Random { length, .. } => Some(*length),
                    SecretSource::Prompt { .. } => None,
                };
                self.validate_file(&store.path_of(id), expected_length)
            }
            PlanEntry::SshKeypair { id } => Ok(self.validate_keypair(store, id)),
            PlanEntry::SelfSignedCert { id, .. } => self.validate_certificate(store, id),
        }
    }

    fn validate_file(&self, path: &Path, expected_length: Option<usize>) -> Result<ValidationResult> {
        if !path.exists() {
            return Ok(ValidationResult::Missing);
        }
        if path.is_dir() {
            return Ok(ValidationResult::Error(vec![
                "expected a file but found a directory".to_string(),
            ]));
        }

        let content = fs::read(path)?;
        if content.is_empty() {
            return Ok(ValidationResult::Warning(vec!["value is empty".to_string()]));
        }

        if let Some(expected) = expected_length {
            let actual = String::from_utf8_lossy(&content).chars().count();
            if actual != expected {
                return Ok(ValidationResult::Warning(vec![format!(
                    "value is {} characters long but {} were expected",
                    actual, expected
                )]));
            }
        }

        Ok(ValidationResult::Ok)
    }

    fn validate_keypair(&self, store: &SecretsDir, id: &SecretId) -> ValidationResult {
        let private_key = store.file_in(id, ssh::PRIVATE_KEY_FILE);
        let public_key = store.file_in(id, ssh::PUBLIC_KEY_FILE);

        match (private_key.is_file(), public_key.is_file()) {
            (true, true) => ValidationResult::Ok,
            (false, false) => ValidationResult::Missing,
            (true, false) => ValidationResult::Error(vec![format!(
                "{} is present but {} is missing",
                ssh::PRIVATE_KEY_FILE,
                ssh::PUBLIC_KEY_FILE
            )]),
            (false, true) => ValidationResult::Error(vec![format!(
                "{} is present but {} is missing",
                ssh::PUBLIC_KEY_FILE,
                ssh::PRIVATE_KEY_FILE
            )]),
        }
    }

    fn validate_certificate(&self, store: &SecretsDir, id: &SecretId) -> Result<ValidationResult> {
        if !store.exists(id) {
            return Ok(ValidationResult::Missing);
        }

        let mut errors = Vec::new();
        for file in [x509::KEY_FILE, x509::CERT_FILE] {
            if !store.file_in(id, file).is_file() {
                errors.push(format!("{} is missing", file));
            }
        }
        if !errors.is_empty() {
            errors.push(format!(
                "provisioning skips existing directories; remove {:?} to regenerate",
                store.path_of(id)
            ));
            return Ok(ValidationResult::Error(errors));
        }

        let pem = fs::read(store.file_in(id, x509::CERT_FILE))?;
        let info = match CertificateInfo::from_pem(&pem) {
            Ok(info) => info,
            Err(e) => return Ok(ValidationResult::Error(vec![e.to_string()])),
        };

        if info.is_expired(self.now) {
            return Ok(ValidationResult::Warning(vec![format!(
                "certificate expired {} ago",
                pretty_duration(self.now - info.not_after)
            )]));
        }

        let remaining = info.not_after - self.now;
        if remaining <= self.expiry_warning {
            return Ok(ValidationResult::Warning(vec![format!(
                "certificate expires in {}",
                pretty_duration(remaining)
            )]));
        }

        Ok(ValidationResult::Ok)
    }
}

/// Validation outcome for one plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSecret {
    /// Secret location
    pub id: SecretId,
    /// Kind of secret
    pub kind: SecretKind,
    /// What validation found
    pub result: ValidationResult,
}

/// Summary of validation results.
#[derive(Debug, Default, Serialize)]
pub struct ValidationSummary {
    /// Secrets that are valid
    pub ok: Vec<String>,
    /// Secrets that are missing
    pub missing: Vec<String>,
    /// Secrets with warnings (path, warnings)
    pub warnings: Vec<(String, Vec<String>)>,
    /// Secrets with errors (path, errors)
    pub errors: Vec<(String, Vec<String>)>,
}

impl ValidationSummary {
    /// Check if all secrets are present and usable.
    pub fn is_all_valid(&self) -> bool {
        self.missing.is_empty() && self.errors.is_empty()
    }

    /// Get total count of secrets.
    pub fn total(&self) -> usize {
        self.ok.len() + self.missing.len() + self.warnings.len() + self.errors.len()
    }
}
