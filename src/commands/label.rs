use anyhow::Result;
use tracing::info;

use crate::cli::LabelArgs;
use crate::config::load_config;
use crate::label::{FileCounterStore, LabelCounter, generate_label, load_template};
use crate::names::generate_folder_name;
use crate::overlay::{entries_to_fields, read_overlay};

pub fn run(args: LabelArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let fields = entries_to_fields(&read_overlay(&args.overlay)?);

    // Reuse the name of the client folder holding the overlay.
    let folder_dir = args.overlay.parent().filter(|dir| !dir.as_os_str().is_empty());
    let folder_name = folder_dir
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| generate_folder_name(&fields, &config.firm.folder_suffix));

    let output = args.output.clone().unwrap_or_else(|| match folder_dir {
        Some(dir) => dir.join(&config.label.file_name),
        None => config.label.file_name.clone().into(),
    });

    let template = load_template(config.label.template_path.as_deref())?;
    let store = FileCounterStore::new(&config.label.counter_path, &config.label.counter_key);
    let mut counter = LabelCounter::new(store, config.label.cycle_len);

    let index = generate_label(&mut counter, &template, &fields, &folder_name, &output)?;
    info!(
        path = %output.display(),
        folder = %folder_name,
        label_index = index,
        "label regenerated"
    );
    Ok(())
}
