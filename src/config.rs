use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub firm: FirmProfile,
    pub label: LabelConfig,
    pub output: OutputConfig,
}

/// Brokerage-specific constants that are written into every field map rather
/// than extracted from the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmProfile {
    pub county: String,
    pub seller_address_line1: String,
    pub seller_address_line2: String,
    pub listing_firm_name: String,
    pub listing_firm_license: String,
    pub listing_firm_address_line1: String,
    pub listing_firm_address_line2: String,
    pub listing_firm_phone: String,
    /// Legal name of the selling entity as it appears in the Parties clause and
    /// the deposit line.
    pub seller_entity: String,
    pub in_city: String,
    pub in_county: String,
    pub deposit_held_by: String,
    pub possession: String,
    pub underwriter: String,
    pub seller_relation: String,
    pub listing_agent_commission: String,
    pub mortgage_instrument: String,
    pub listing_commission_pct: f64,
    pub folder_suffix: String,
}

impl Default for FirmProfile {
    fn default() -> Self {
        Self {
            county: "DeSoto".to_string(),
            seller_address_line1: "5740 Getwell Road Building 8B".to_string(),
            seller_address_line2: "Southaven, MS 38672".to_string(),
            listing_firm_name: "Legacy Homes Realty, LLC".to_string(),
            listing_firm_license: "24125".to_string(),
            listing_firm_address_line1: "5740 Getwell Rd Bldg 8B".to_string(),
            listing_firm_address_line2: "Southaven, MS 38672".to_string(),
            listing_firm_phone: "6629322282".to_string(),
            seller_entity: "LEGACY NEW HOMES, LLC".to_string(),
            in_city: "X".to_string(),
            in_county: "X".to_string(),
            deposit_held_by: "Seller".to_string(),
            possession: "Fee Simple".to_string(),
            underwriter: "Chicago Title Insurance Company".to_string(),
            seller_relation: String::new(),
            listing_agent_commission: "2%".to_string(),
            mortgage_instrument: "Deed of Trust".to_string(),
            listing_commission_pct: 2.0,
            folder_suffix: "  25-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub counter_path: PathBuf,
    pub counter_key: String,
    pub cycle_len: u32,
    pub template_path: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            counter_path: PathBuf::from("config.ini"),
            counter_key: "label_index".to_string(),
            cycle_len: 20,
            template_path: None,
            file_name: "file label.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_output_dir: Option<PathBuf>,
    pub subfolders: Vec<String>,
    pub overlay_file_name: String,
    pub setup_docs_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_output_dir: None,
            subfolders: vec!["Setup".to_string(), "TitleSearch".to_string()],
            overlay_file_name: "overlay.pxt".to_string(),
            setup_docs_file_name: "setup docs.txt".to_string(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "config file missing; using defaults");
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if raw.trim().is_empty() {
        warn!(path = %path.display(), "config file empty; using defaults");
        return Ok(AppConfig::default());
    }

    let config: AppConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(path = %path.display(), "loaded configuration");

    Ok(config)
}
