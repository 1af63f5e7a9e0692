use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::CliConfig;
use crate::graph;

/// Re-serialize a graph: ids become positional again and items that
/// failed to load are dropped.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Graph file to normalize
    pub path: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl NormalizeArgs {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let mut loaded = graph::load(&self.path, config)?;
        graph::report_problems(&loaded);
        let token = loaded.store.to_graph_token()?;
        graph::write_json(&token, self.output.as_deref())
    }
}
