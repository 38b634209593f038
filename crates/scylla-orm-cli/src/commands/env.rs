// Rust guideline compliant 2026-02-07

//! Implementation of the `sorm env` command.

use anyhow::Result;
use scylla_orm_core::{ApplicationEnvironment, Config};
use serde_json::json;

/// Shows the active application environment and its keyspace settings.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(config: &Config, json_output: bool) -> Result<String> {
    let explicit = ApplicationEnvironment::is_set();
    let name = ApplicationEnvironment::get_environment();
    let env = config.environment(&name);
    let configured = config.environments.contains_key(&name);

    if json_output {
        let output = json!({
            "environment": name,
            "explicit": explicit,
            "configured": configured,
            "durable_writes": env.durable_writes,
            "replication": env.replication.to_cql(),
        });
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Environment:    {}{}\n",
        name,
        if explicit { "" } else { " (default)" }
    ));
    output.push_str(&format!(
        "Configured:     {}\n",
        if configured { "yes" } else { "no, using defaults" }
    ));
    output.push_str(&format!("Replication:    {}\n", env.replication.to_cql()));
    output.push_str(&format!("Durable writes: {}\n", env.durable_writes));
    Ok(output)
}
