use std::io::{self, Write};

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ShowArgs;
use crate::overlay::{entry_table, read_overlay};

pub fn run(args: ShowArgs) -> Result<()> {
    let entries = read_overlay(&args.overlay)?;
    if entries.is_empty() {
        bail!("no fields found in {}", args.overlay.display());
    }
    info!(path = %args.overlay.display(), rows = entries.len(), "overlay loaded");

    let mut output = io::BufWriter::new(io::stdout().lock());
    write!(output, "{}", entry_table(&entries))?;
    output.flush()?;
    Ok(())
}
