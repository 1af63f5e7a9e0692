use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::config::CliConfig;
use crate::graph;

/// Emit the partial-copy batch for a set of items, as a paste buffer would
/// hold it.
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Graph file to copy from
    pub path: PathBuf,

    /// Ids of the items to copy, as found in the file
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<i64>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CopyArgs {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let mut loaded = graph::load(&self.path, config)?;
        graph::report_problems(&loaded);

        let store = &mut loaded.store;
        store.on_node_selected(None, false, false);
        for id in &self.ids {
            let key = store
                .item_by_id(*id)
                .map(weave_canvas::item::CanvasItem::key)
                .with_context(|| format!("no item with id {id} in {}", self.path.display()))?;
            if !store.selection().contains(&key) {
                store.on_node_selected(Some(key), true, true);
            }
        }
        if store.selection().is_empty() {
            bail!("nothing selected");
        }

        let batch = store.serialize_selection()?;
        graph::write_json(&batch, self.output.as_deref())
    }
}
