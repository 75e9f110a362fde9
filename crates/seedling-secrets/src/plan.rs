//! The ordered catalog of secrets an installation needs.

use crate::provisioner::Provisioner;
use crate::types::{Prompt, RandomStreams};
use rand::{CryptoRng, RngCore};
use seedling_types::{bail, Console, Outcome, Result, SecretId, SecretKind};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Length of the generated database passwords.
pub const DATABASE_PASSWORD_LENGTH: usize = 48;

/// Random stream shared by the database passwords.
pub const DATABASE_STREAM: &str = "database";

/// Where a simple secret's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Next value of the named random stream
    Random {
        /// Stream name; entries naming the same stream share it
        stream: String,
        /// Characters per value
        length: usize,
    },
    /// One line typed in by the operator
    Prompt {
        /// Text shown before reading
        text: String,
    },
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    /// A single-file secret
    Secret {
        /// Secret location
        id: SecretId,
        /// Value source
        source: SecretSource,
    },
    /// An SSH keypair directory
    SshKeypair {
        /// Secret location
        id: SecretId,
    },
    /// A self-signed certificate directory
    SelfSignedCert {
        /// Secret location
        id: SecretId,
        /// Text shown when asking for the domain name
        prompt: String,
    },
}

impl PlanEntry {
    /// The secret this entry provisions.
    pub fn id(&self) -> &SecretId {
        match self {
            PlanEntry::Secret { id, .. }
            | PlanEntry::SshKeypair { id }
            | PlanEntry::SelfSignedCert { id, .. } => id,
        }
    }

    /// What kind of secret this entry provisions.
    pub fn kind(&self) -> SecretKind {
        match self {
            PlanEntry::Secret { source: SecretSource::Random { .. }, .. } => SecretKind::Random,
            PlanEntry::Secret { source: SecretSource::Prompt { .. }, .. } => SecretKind::Prompted,
            PlanEntry::SshKeypair { .. } => SecretKind::SshKeypair,
            PlanEntry::SelfSignedCert { .. } => SecretKind::SelfSignedCert,
        }
    }
}

/// What a provisioning run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// Secrets written during this run
    pub created: Vec<SecretId>,
    /// Secrets that already existed
    pub skipped: Vec<SecretId>,
}

impl ProvisionReport {
    /// Record the outcome for `id`.
    pub fn record(&mut self, id: &SecretId, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created.push(id.clone()),
            Outcome::Skipped => self.skipped.push(id.clone()),
        }
    }

    /// What happened to the secret at `id`, if it was processed.
    pub fn outcome_of(&self, id: &str) -> Option<Outcome> {
        if self.created.iter().any(|c| c.as_str() == id) {
            Some(Outcome::Created)
        } else if self.skipped.iter().any(|s| s.as_str() == id) {
            Some(Outcome::Skipped)
        } else {
            None
        }
    }
}

/// Ordered list of secrets to provision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretPlan {
    entries: Vec<PlanEntry>,
}

impl SecretPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog for a fresh installation.
    ///
    /// Both database passwords draw from the same stream, so when the first
    /// one already exists the second receives the stream's first value.
    pub fn default_catalog() -> Result<Self> {
        let mut plan = Self::new();
        plan.random("postgresql/nextcloud", DATABASE_STREAM, DATABASE_PASSWORD_LENGTH)?
            .prompt(
                "initial/user",
                "Password for the initial user for all services\n\
                 This user will have administrative rights in all services",
            )?
            .prompt("initial/password", "Password for the initial user for all services")?
            .self_signed_cert("nginx/cert", "Domain name for the self-signed TLS certificate")?
            .ssh_keypair("backup")?
            .random("backup/nextcloud", DATABASE_STREAM, DATABASE_PASSWORD_LENGTH)?;
        plan.validate_definition()?;
        Ok(plan)
    }

    /// Add an entry to the plan.
    pub fn add(&mut self, entry: PlanEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Add a random secret drawn from `stream`.
    pub fn random(&mut self, id: &str, stream: &str, length: usize) -> Result<&mut Self> {
        let id = SecretId::new(id)?;
        Ok(self.add(PlanEntry::Secret {
            id,
            source: SecretSource::Random {
                stream: stream.to_string(),
                length,
            },
        }))
    }

    /// Add a secret typed in by the operator.
    pub fn prompt(&mut self, id: &str, text: &str) -> Result<&mut Self> {
        let id = SecretId::new(id)?;
        Ok(self.add(PlanEntry::Secret {
            id,
            source: SecretSource::Prompt { text: text.to_string() },
        }))
    }

    /// Add an SSH keypair.
    pub fn ssh_keypair(&mut self, id: &str) -> Result<&mut Self> {
        let id = SecretId::new(id)?;
        Ok(self.add(PlanEntry::SshKeypair { id }))
    }

    /// Add a self-signed certificate whose domain is asked with `prompt`.
    pub fn self_signed_cert(&mut self, id: &str, prompt: &str) -> Result<&mut Self> {
        let id = SecretId::new(id)?;
        Ok(self.add(PlanEntry::SelfSignedCert {
            id,
            prompt: prompt.to_string(),
        }))
    }

    /// Check the plan for conflicting definitions.
    ///
    /// Rejects duplicate ids and streams used with different lengths.
    pub fn validate_definition(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut stream_lengths: HashMap<&str, usize> = HashMap::new();

        for entry in &self.entries {
            if !seen.insert(entry.id()) {
                bail!(Secret, "Secret '{}' is defined more than once", entry.id());
            }

            if let PlanEntry::Secret { id, source: SecretSource::Random { stream, length } } = entry {
                if *length == 0 {
                    bail!(Secret, "Random secret '{}' must have a length greater than 0", id);
                }
                let existing = *stream_lengths.entry(stream.as_str()).or_insert(*length);
                if existing != *length {
                    bail!(
                        Secret,
                        "Stream '{}' is used with lengths {} and {}",
                        stream,
                        existing,
                        length
                    );
                }
            }
        }

        Ok(())
    }

    /// Entries in execution order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Get all secret ids.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id().to_string()).collect()
    }

    /// Get count of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Provision every missing secret, drawing random values from the
    /// thread-local CSPRNG.
    pub fn provision(&self, provisioner: &Provisioner<'_>, console: &mut dyn Console) -> Result<ProvisionReport> {
        self.provision_with(provisioner, console, &mut RandomStreams::new())
    }

    /// Provision every missing secret, drawing random values from `streams`.
    ///
    /// Entries run strictly in order and the first failure aborts the run.
    pub fn provision_with<R: RngCore + CryptoRng>(
        &self,
        provisioner: &Provisioner<'_>,
        console: &mut dyn Console,
        streams: &mut RandomStreams<R>,
    ) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        for entry in &self.entries {
            let outcome = match entry {
                PlanEntry::Secret { id, source: SecretSource::Random { stream, length } } => {
                    provisioner.ensure_secret(id, streams.stream(stream, *length))?
                }
                PlanEntry::Secret { id, source: SecretSource::Prompt { text } } => {
                    provisioner.ensure_secret(id, &mut Prompt::new(text.as_str(), &mut *console))?
                }
                PlanEntry::SshKeypair { id } => provisioner.ensure_ssh_keypair(id)?,
                PlanEntry::SelfSignedCert { id, prompt } => {
                    provisioner.ensure_self_signed_cert(id, &mut Prompt::new(prompt.as_str(), &mut *console))?
                }
            };
            report.record(entry.id(), outcome);
        }

        Ok(report)
    }
}
