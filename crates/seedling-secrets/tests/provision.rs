use rand::rngs::StdRng;
use rand::SeedableRng;
use seedling_secrets::{
    LineConsole, Provisioner, RandomStreams, RandomStrings, SecretPlan, SecretValidator, SecretsDir,
};
use seedling_types::{CertificateGenerator, KeypairGenerator, Outcome, Result, SecretId};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SEED: u64 = 0x5eed;

#[derive(Default)]
struct FakeKeygen {
    runs: Cell<usize>,
}

impl KeypairGenerator for FakeKeygen {
    fn generate_keypair(&self, private_key: &Path) -> Result<()> {
        self.runs.set(self.runs.get() + 1);
        fs::write(private_key, "PRIVATE")?;
        fs::write(private_key.with_extension("pub"), "PUBLIC")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "fake-keygen"
    }
}

#[derive(Default)]
struct FakeCertgen {
    runs: Cell<usize>,
}

impl CertificateGenerator for FakeCertgen {
    fn generate_self_signed(&self, domain: &str, key_pem: &Path, cert_pem: &Path) -> Result<()> {
        self.runs.set(self.runs.get() + 1);
        fs::write(key_pem, "KEY")?;
        fs::write(cert_pem, format!("CERT for {}", domain))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "fake-openssl"
    }
}

fn seeded_streams() -> RandomStreams<StdRng> {
    RandomStreams::with_factory(|| StdRng::seed_from_u64(SEED))
}

fn first_seeded_value() -> String {
    RandomStrings::with_rng(48, StdRng::seed_from_u64(SEED))
        .next()
        .unwrap()
        .unwrap()
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

#[test]
fn test_fresh_directory_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("secrets");
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(&root), &keygen, &certgen);
    let plan = SecretPlan::default_catalog().unwrap();

    let mut console = LineConsole::new("admin\nhunter2\n  example.com \n".as_bytes(), Vec::new());
    let report = plan
        .provision_with(&provisioner, &mut console, &mut seeded_streams())
        .unwrap();

    assert_eq!(report.created.len(), 6);
    assert!(report.skipped.is_empty());

    assert_eq!(read(&root, "postgresql/nextcloud"), first_seeded_value());
    assert_eq!(read(&root, "initial/user"), "admin");
    assert_eq!(read(&root, "initial/password"), "hunter2");
    assert_eq!(read(&root, "nginx/cert/key.pem"), "KEY");
    assert_eq!(read(&root, "nginx/cert/cert.pem"), "CERT for example.com");
    assert_eq!(read(&root, "backup/key"), "PRIVATE");
    assert_eq!(read(&root, "backup/key.pub"), "PUBLIC");

    let backup = read(&root, "backup/nextcloud");
    assert_eq!(backup.len(), 48);
    assert_ne!(backup, read(&root, "postgresql/nextcloud"));

    let shown = String::from_utf8(console.into_output()).unwrap();
    assert_eq!(shown.matches("Please enter (or leave empty to skip):").count(), 3);
}

#[test]
fn test_second_run_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(temp_dir.path()), &keygen, &certgen);
    let plan = SecretPlan::default_catalog().unwrap();

    let mut console = LineConsole::new("admin\nhunter2\nexample.com\n".as_bytes(), Vec::new());
    plan.provision(&provisioner, &mut console).unwrap();
    let first = read(temp_dir.path(), "postgresql/nextcloud");

    let mut silent = LineConsole::new("".as_bytes(), Vec::new());
    let report = plan.provision(&provisioner, &mut silent).unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.skipped.len(), 6);
    assert!(silent.into_output().is_empty());
    assert_eq!(keygen.runs.get(), 1);
    assert_eq!(certgen.runs.get(), 1);
    assert_eq!(read(temp_dir.path(), "postgresql/nextcloud"), first);

    let summary = SecretValidator::new(30).summary(&plan, provisioner.store()).unwrap();
    assert_eq!(summary.missing.len(), 0);
}

#[test]
fn test_existing_user_is_not_prompted_for() {
    let temp_dir = TempDir::new().unwrap();
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(temp_dir.path()), &keygen, &certgen);
    let user = SecretId::new("initial/user").unwrap();
    provisioner.store().write(&user, "root").unwrap();

    let mut console = LineConsole::new("hunter2\nexample.com\n".as_bytes(), Vec::new());
    let report = SecretPlan::default_catalog()
        .unwrap()
        .provision(&provisioner, &mut console)
        .unwrap();

    assert_eq!(report.skipped, vec![user]);
    assert_eq!(read(temp_dir.path(), "initial/user"), "root");
    assert_eq!(read(temp_dir.path(), "initial/password"), "hunter2");
    assert_eq!(read(temp_dir.path(), "nginx/cert/cert.pem"), "CERT for example.com");

    let shown = String::from_utf8(console.into_output()).unwrap();
    assert!(!shown.contains("This user will have administrative rights"));
}

#[test]
fn test_shared_stream_restarts_when_first_secret_exists() {
    let temp_dir = TempDir::new().unwrap();
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(temp_dir.path()), &keygen, &certgen);
    provisioner
        .store()
        .write(&SecretId::new("postgresql/nextcloud").unwrap(), "already-there")
        .unwrap();

    let mut console = LineConsole::new("admin\nhunter2\nexample.com\n".as_bytes(), Vec::new());
    let report = SecretPlan::default_catalog()
        .unwrap()
        .provision_with(&provisioner, &mut console, &mut seeded_streams())
        .unwrap();

    assert_eq!(report.outcome_of("postgresql/nextcloud"), Some(Outcome::Skipped));
    assert_eq!(read(temp_dir.path(), "backup/nextcloud"), first_seeded_value());
}

#[test]
fn test_interrupted_certificate_is_not_regenerated() {
    let temp_dir = TempDir::new().unwrap();
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(temp_dir.path()), &keygen, &certgen);
    provisioner.store().create_dir(&SecretId::new("nginx/cert").unwrap()).unwrap();

    let mut console = LineConsole::new("admin\nhunter2\n".as_bytes(), Vec::new());
    let plan = SecretPlan::default_catalog().unwrap();
    plan.provision(&provisioner, &mut console).unwrap();

    assert_eq!(certgen.runs.get(), 0);
    let summary = SecretValidator::new(30).summary(&plan, provisioner.store()).unwrap();
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].0, "nginx/cert");
}

#[test]
fn test_closed_input_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let (keygen, certgen) = (FakeKeygen::default(), FakeCertgen::default());
    let provisioner = Provisioner::new(SecretsDir::new(temp_dir.path()), &keygen, &certgen);

    let mut console = LineConsole::new("admin\n".as_bytes(), Vec::new());
    let err = SecretPlan::default_catalog()
        .unwrap()
        .provision(&provisioner, &mut console)
        .unwrap_err();

    assert!(err.to_string().contains("initial/password"));
    assert!(temp_dir.path().join("initial/user").exists());
    assert!(!temp_dir.path().join("nginx/cert").exists());
    assert_eq!(keygen.runs.get(), 0);
}
