//! Check command - validate configuration and resolve routes

use anyhow::Result;
use clap::Args;
use logship_config::Config;

/// Check command arguments
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Log types to resolve against the configured routes
    pub log_types: Vec<String>,
}

/// Run the check command
///
/// The config was already parsed and validated by the time this runs.
pub fn run(config: &Config, args: CheckArgs) -> Result<()> {
    let table = config.routing_table()?;

    println!("config ok");
    println!(
        "shipper: flush_interval={} max_ready_entries={} protocol_version={}",
        config
            .shipper
            .flush_interval()
            .map_or_else(|| "disabled".to_string(), |d| format!("{}ms", d.as_millis())),
        config.shipper.max_ready_entries,
        config.shipper.protocol_version,
    );

    println!("routes ({}):", table.rule_count());
    for rule in table.rules() {
        println!("  {:<16} {:<24} {}", rule.name(), rule.pattern(), rule.capacity());
    }

    let mut unmatched = 0;
    for log_type in &args.log_types {
        match table.resolve_rule(log_type) {
            Some(rule) => println!("{log_type} -> {} ({} bytes)", rule.name(), rule.capacity()),
            None => {
                println!("{log_type} -> no matching route");
                unmatched += 1;
            }
        }
    }

    if unmatched > 0 {
        anyhow::bail!("{unmatched} log type(s) have no route");
    }
    Ok(())
}
