use eyre::Result;
use missive_config::Config;

/// `missive config`: prints the resolved config with secrets redacted.
pub fn run(config: &Config) -> Result<()> {
    print!("{}", config.redacted().to_string_pretty()?);
    Ok(())
}
