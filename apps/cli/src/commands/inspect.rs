use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use indexmap::IndexMap;

use crate::config::CliConfig;
use crate::graph;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Graph file to inspect
    pub path: PathBuf,

    /// Fail when any item could not be loaded
    #[arg(long)]
    pub strict: bool,
}

impl InspectArgs {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let loaded = graph::load(&self.path, config)?;

        let mut by_type: IndexMap<&str, usize> = IndexMap::new();
        for item in loaded.store.items() {
            *by_type.entry(item.type_name()).or_default() += 1;
        }

        println!("items: {}", loaded.store.len());
        for (item_type, count) in &by_type {
            println!("  {item_type}: {count}");
        }
        println!("properties: {}", loaded.store.properties().len());
        println!("failed: {}", loaded.report.failures.len());
        println!("diagnostics: {}", loaded.diagnostics.len());
        graph::report_problems(&loaded);

        if self.strict && !loaded.report.is_clean() {
            bail!(
                "{} item(s) failed to load from {}",
                loaded.report.failures.len(),
                self.path.display()
            );
        }
        Ok(())
    }
}
