//! Generate every missing secret.

use crate::ui::progress::Spinning;
use anyhow::{Context, Result};
use colored::Colorize;
use seedling_core::term::colorize;
use seedling_core::ProvisionConfig;
use seedling_secrets::{console, tools_from_config, Provisioner, SecretPlan, SecretsDir};

pub fn execute(settings: &ProvisionConfig) -> Result<()> {
    println!("{}", colorize("#G{This application is used to generate all required secrets for your installation}"));
    println!("{}", colorize("#Y{It will not overwrite any existing secrets}"));

    let plan = SecretPlan::default_catalog()?;
    let store = SecretsDir::new(&settings.secrets_dir);

    let (keygen, certgen) = tools_from_config(&settings.tools);
    let keygen = Spinning::new(keygen);
    let certgen = Spinning::new(certgen);
    let provisioner = Provisioner::new(store, &keygen, &certgen);

    let mut console = console::detect();
    let report = plan
        .provision(&provisioner, &mut *console)
        .with_context(|| format!("Failed to provision secrets in {:?}", settings.secrets_dir))?;

    println!();
    for id in &report.created {
        println!("  {} {}", "+".green(), id);
    }
    println!(
        "{} {} created, {} already present",
        "✓".green().bold(),
        report.created.len(),
        report.skipped.len()
    );

    Ok(())
}
