use std::path::Path;

use mb_domain::config::{Config, ConfigSeverity};

/// Print every issue and a summary line. Returns `false` when any issue
/// is an error.
pub fn validate(config: &Config, config_path: &Path) -> bool {
    let issues = config.validate();
    let path = config_path.display();

    if issues.is_empty() {
        println!("Config OK ({path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }
    println!("\n{error_count} error(s), {warning_count} warning(s) in {path}");

    error_count == 0
}

/// Dump the resolved config as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    print!("{output}");
    Ok(())
}
