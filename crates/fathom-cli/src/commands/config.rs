use std::io::Write;

use fathom_core::config::FathomConfig;

pub fn print(config: &FathomConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    write!(out, "{}", config.to_toml()?)?;
    Ok(())
}
