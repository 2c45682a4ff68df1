//! Environment variable helpers used by service configuration loaders.
//!
//! Configuration is read once at startup; a missing required variable is a
//! startup failure carrying the variable name.

use anyhow::{Context as _, bail};

/// Read a required variable. Empty values count as missing.
pub fn required_var(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} is not set"))?;
    if value.trim().is_empty() {
        bail!("{name} is empty");
    }
    Ok(value)
}

/// Read an optional variable, treating empty values as unset.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable, falling back to `default` when unset.
pub fn parsed_var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
