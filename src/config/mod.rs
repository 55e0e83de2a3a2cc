mod company;
mod seed;

pub use company::{Company, Config, InvoiceSettings};
pub use seed::Seed;

use crate::error::{AgencyError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.agency/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "agency") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        AgencyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".agency"))
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(AgencyError::ConfigFileNotFound(path));
    }
    tracing::debug!(path = %path.display(), "loading config");
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AgencyError::ConfigParse { path, source: e })
}

/// Load seed.toml (an empty store if missing)
pub fn load_seed(config_dir: &Path) -> Result<Seed> {
    let path = config_dir.join("seed.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no seed file, starting empty");
        return Ok(Seed::default());
    }
    tracing::debug!(path = %path.display(), "loading seed");
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AgencyError::ConfigParse { path, source: e })
}

/// Write the template files into a fresh config directory
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(AgencyError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(config_dir.join("seed.toml"), SEED_TEMPLATE)?;
    tracing::info!(path = %config_dir.display(), "initialized config directory");
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Agency"
address = "12 MG Road, Bengaluru 560001"
email = "billing@youragency.com"
# phone = "+91-80-5555-0100"       # optional
# gst_number = "29AAPCT1234K1Z0"   # optional

[invoice]
number_prefix = "INV"      # invoices are numbered INV-001, INV-002, ...
proposal_prefix = "PROP"
currency_symbol = "₹"
due_days = 14
tax_enabled = true         # new invoices start with tax on
tax_rate = 18.0            # percent
"#;

/// Template content for seed.toml
pub const SEED_TEMPLATE: &str = r#"# Records loaded into memory on every run.
# Changes made by commands are not written back; edit this file to change
# the starting data.

[[clients]]
id = "1"
name = "Acme Corporation"
email = "contact@acme.com"
phone = "+1-555-0101"
company = "Acme Corp"
status = "Active"
created_at = "2024-01-15"
address = "123 Business St, New York, NY 10001"
gst_number = "18AAPCT1234K1Z0"

[[clients]]
id = "2"
name = "Tech Startup Inc"
email = "info@techstartup.com"
phone = "+1-555-0102"
company = "Tech Startup"
status = "Active"
created_at = "2024-01-20"
address = "456 Tech Ave, San Francisco, CA 94105"
gst_number = "27AABCT1234K1Z0"

[[projects]]
id = "1"
name = "Website Redesign"
client_id = "1"
status = "InProgress"
progress = 75
start_date = "2024-01-10"
end_date = "2024-03-10"
budget = 10000.0

[[projects]]
id = "2"
name = "Mobile App"
client_id = "2"
status = "Planning"
progress = 20
start_date = "2024-02-01"
end_date = "2024-06-01"
budget = 25000.0

[[tasks]]
id = "1"
title = "Design Homepage"
description = "Create homepage design mockups"
client_id = "1"
project_id = "1"
status = "InProgress"
priority = "High"
due_date = "2024-02-20"

[[tasks]]
id = "2"
title = "Setup Database"
description = "Configure database and migrations"
client_id = "2"
project_id = "2"
status = "Todo"
priority = "High"
due_date = "2024-02-25"

[[invoices]]
id = "1"
number = "INV-001"
client_id = "1"
date = "2024-02-01"
due_date = "2024-02-15"
status = "Paid"
notes = "Thank you for your business!"
tax = { enabled = true, rate = 18.0 }
items = [
  { description = "Website Design & Development", quantity = 1.0, rate = 5000.0 },
]

[[invoices]]
id = "2"
number = "INV-002"
client_id = "2"
date = "2024-02-05"
due_date = "2024-02-20"
status = "Pending"
tax = { enabled = true, rate = 18.0 }
items = [
  { description = "Mobile App Development", quantity = 1.0, rate = 3500.0 },
]
"#;
