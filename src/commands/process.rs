use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};

use crate::cli::ProcessArgs;
use crate::config::load_config;
use crate::label::{FileCounterStore, LabelCounter};
use crate::overlay::field_table;
use crate::pdf_text::PdftotextSource;
use crate::pipeline::{Pipeline, ProcessRequest};

pub fn run(args: ProcessArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.default_output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let store = FileCounterStore::new(&config.label.counter_path, &config.label.counter_key);
    let mut counter = LabelCounter::new(store, config.label.cycle_len);
    let pipeline = Pipeline::new(config, PdftotextSource::default())?;

    let request = ProcessRequest {
        pdf: args.pdf.clone(),
        output_dir,
        folder_name: args.folder_name.clone(),
        overwrite: args.overwrite,
        write_label: !args.no_label,
        write_setup_docs: !args.no_setup_docs,
    };

    let outcome = match pipeline.process(&request, &mut counter) {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(partial) = err.partial_fields() {
                error!(
                    populated = partial.populated_count(),
                    "showing partially extracted fields"
                );
                let mut output = io::BufWriter::new(io::stdout().lock());
                write!(output, "{}", field_table(partial))?;
                output.flush()?;
            }
            return Err(err.into());
        }
    };

    info!(
        folder = %outcome.folder.folder_path.display(),
        manifest = %outcome.manifest_path.display(),
        populated = outcome.manifest.counts.populated_field_count,
        absent = outcome.manifest.counts.absent_field_count,
        "process completed"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(output, "{}", outcome.folder.folder_path.display())?;
    output.flush()?;
    Ok(())
}
