use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "contract-intake",
    version,
    about = "Extract Legacy purchase-contract fields and set up client folders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract fields and print them without writing anything.
    Extract(ExtractArgs),
    /// Extract fields and build the client folder.
    Process(ProcessArgs),
    /// Print a saved overlay file as a label/value table.
    Show(ShowArgs),
    /// Render a file label from a saved overlay file.
    Label(LabelArgs),
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Text previously extracted from a contract, read as-is.
    #[arg(long)]
    pub text_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Parent directory for client folders; falls back to the configured
    /// default, then the current directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Use this folder name instead of the one derived from the buyer name.
    #[arg(long)]
    pub folder_name: Option<String>,

    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    #[arg(long, default_value_t = false)]
    pub no_label: bool,

    #[arg(long, default_value_t = false)]
    pub no_setup_docs: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long)]
    pub overlay: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    #[arg(long)]
    pub overlay: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Defaults to the configured label file name next to the overlay.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
