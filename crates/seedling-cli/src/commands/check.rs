//! Report on the secrets directory without modifying it.

use anyhow::{bail, Result};
use colored::Colorize;
use seedling_core::ProvisionConfig;
use seedling_secrets::{SecretPlan, SecretValidator, SecretsDir, ValidationSummary};

pub fn execute(settings: &ProvisionConfig, json: bool) -> Result<()> {
    let plan = SecretPlan::default_catalog()?;
    let store = SecretsDir::new(&settings.secrets_dir);

    let summary = SecretValidator::new(settings.expiry_warning_days).summary(&plan, &store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&store, &summary);
    }

    if !summary.is_all_valid() {
        bail!(
            "{} of {} secrets are missing or invalid",
            summary.missing.len() + summary.errors.len(),
            summary.total()
        );
    }

    Ok(())
}

fn print_summary(store: &SecretsDir, summary: &ValidationSummary) {
    println!("{} secrets in {:?}", "Checking".cyan().bold(), store.root());

    for path in &summary.ok {
        println!("  {} {}", "✓".green(), path);
    }
    for path in &summary.missing {
        println!("  {} {} (missing)", "✗".red(), path);
    }
    for (path, warnings) in &summary.warnings {
        println!("  {} {}", "!".yellow(), path);
        for warning in warnings {
            println!("      {}", warning.yellow());
        }
    }
    for (path, errors) in &summary.errors {
        println!("  {} {}", "✗".red().bold(), path);
        for error in errors {
            println!("      {}", error.red());
        }
    }

    println!(
        "\n{} ok, {} missing, {} warnings, {} errors",
        summary.ok.len(),
        summary.missing.len(),
        summary.warnings.len(),
        summary.errors.len()
    );
}
