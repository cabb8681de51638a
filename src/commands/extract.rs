use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::warn;

use crate::cli::ExtractArgs;
use crate::config::load_config;
use crate::model::FieldMap;
use crate::overlay::field_table;
use crate::pdf_text::{PdftotextSource, PlainTextSource, TextSource};
use crate::pipeline::{Pipeline, require_essential};

#[derive(Debug, Serialize)]
struct ExtractResponse<'a> {
    source: String,
    folder_name: &'a str,
    essential_fields_present: bool,
    fields: &'a FieldMap,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let (source_path, fields, folder_name) = match (&args.input.pdf, &args.input.text_file) {
        (Some(pdf), _) => {
            let (fields, folder_name) =
                extract_with(Pipeline::new(config, PdftotextSource::default())?, pdf)?;
            (pdf, fields, folder_name)
        }
        (None, Some(text_file)) => {
            let (fields, folder_name) =
                extract_with(Pipeline::new(config, PlainTextSource)?, text_file)?;
            (text_file, fields, folder_name)
        }
        (None, None) => bail!("either --pdf or --text-file is required"),
    };

    let essential_fields_present = match require_essential(&fields) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "contract is missing essential data");
            false
        }
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        let response = ExtractResponse {
            source: source_path.display().to_string(),
            folder_name: &folder_name,
            essential_fields_present,
            fields: &fields,
        };
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize extract json output")?;
        writeln!(output)?;
    } else {
        writeln!(output, "Source: {}", source_path.display())?;
        writeln!(output, "Proposed folder: {folder_name}")?;
        writeln!(
            output,
            "Fields: {} of {} populated",
            fields.populated_count(),
            fields.len()
        )?;
        writeln!(output)?;
        write!(output, "{}", field_table(&fields))?;
    }
    output.flush()?;

    Ok(())
}

fn extract_with<T: TextSource>(pipeline: Pipeline<T>, path: &Path) -> Result<(FieldMap, String)> {
    let fields = pipeline.extract(path)?;
    let folder_name = pipeline.proposed_folder_name(&fields);
    Ok((fields, folder_name))
}
