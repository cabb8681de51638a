use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

macro_rules! field_keys {
    ($($variant:ident => $name:literal,)+) => {
        /// Closed vocabulary of overlay field names.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub enum FieldKey {
            $($variant,)+
        }

        impl FieldKey {
            pub const ALL: &'static [FieldKey] = &[$(FieldKey::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(FieldKey::$variant => $name,)+
                }
            }

            pub fn parse(name: &str) -> Option<Self> {
                match name.trim() {
                    $($name => Some(FieldKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

field_keys! {
    County => "COUNTY",
    Slr1Adr1 => "SLR1ADR1",
    Slr1Adr2 => "SLR1ADR2",
    Ag701Frm => "AG701FRM",
    Ag701Lic => "AG701LIC",
    Ag701Ad1 => "AG701AD1",
    Ag701Ad2 => "AG701AD2",
    Ag701Ph => "AG701PH",
    InCity => "INCITY",
    InCounty => "INCOUNTY",
    DepHeld => "DEPHELD",
    Possion => "POSSION",
    UndName => "UNDNAME",
    Slr1Nam1 => "SLR1NAM1",
    Slr1Rel1 => "SLR1REL1",
    Slr1Nam2 => "SLR1NAM2",
    Slr1Cell1 => "SLR1CELL1",
    Slr1Email => "SLR1EMAIL",
    Slr1Cell2 => "SLR1CELL2",
    Slr1Email2 => "SLR1EMAIL2",
    ParcelId => "PARCELID",
    PListingAgent => "PLISTINGAGENT",
    MtdtType => "MTDTTYPE",
    SalePric => "SALEPRIC",
    Deposit => "DEPOSIT",
    SettDate => "SETTDATE",
    Byr1Nam1 => "BYR1NAM1",
    Byr1Nam2 => "BYR1NAM2",
    Byr1Rel1 => "BYR1REL1",
    Byr1Adr1 => "BYR1ADR1",
    Byr1Adr2 => "BYR1ADR2",
    Byr1Cell1 => "BYR1CELL1",
    Byr1Email => "BYR1EMAIL",
    Byr1Cell2 => "BYR1CELL2",
    Byr1Email2 => "BYR1EMAIL2",
    LorU => "LORU",
    LotUnit => "LOTUNIT",
    Subdivn => "SUBDIVN",
    PropStre => "PROPSTRE",
    PropCity => "PROPCITY",
    StateLet => "STATELET",
    PropZip => "PROPZIP",
    Ag701Nam => "AG701NAM",
    Ag701Mo => "AG701MO",
    Ag701Email => "AG701EMAIL",
    Ag701ContLic => "AG701CONTLIC",
    Ag702Frm => "AG702FRM",
    Ag702Lic => "AG702LIC",
    Ag702Ad1 => "AG702AD1",
    Ag702Ad2 => "AG702AD2",
    Ag702Ph => "AG702PH",
    Ag702Nam => "AG702NAM",
    Ag702Mo => "AG702MO",
    Ag702Email => "AG702EMAIL",
    Ag702ContLic => "AG702CONTLIC",
    CompCt => "COMPCT",
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every key of the vocabulary is always present; an unmatched field holds `None`.
///
/// Stored values are single-line: line breaks inside a capture are folded to
/// spaces so each field fits one overlay line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    values: Vec<Option<String>>,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMap {
    pub fn new() -> Self {
        Self {
            values: vec![None; FieldKey::ALL.len()],
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values[key as usize].as_deref()
    }

    pub fn set(&mut self, key: FieldKey, value: Option<String>) {
        self.values[key as usize] = value.map(|value| fold_line_breaks(&value));
    }

    pub fn set_str(&mut self, key: FieldKey, value: &str) {
        self.set(key, Some(value.to_string()));
    }

    /// Fields in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, Option<&str>)> + '_ {
        FieldKey::ALL
            .iter()
            .map(move |key| (*key, self.values[*key as usize].as_deref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn populated_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    pub fn absent_keys(&self) -> Vec<FieldKey> {
        self.iter()
            .filter_map(|(key, value)| value.is_none().then_some(key))
            .collect()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), &value)?;
        }
        map.end()
    }
}

fn fold_line_breaks(value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        return value.to_string();
    }

    value
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaths {
    pub source_pdf: String,
    pub output_dir: String,
    pub folder_path: String,
    pub overlay_path: String,
    pub label_path: Option<String>,
    pub setup_docs_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessCounts {
    pub field_count: usize,
    pub populated_field_count: usize,
    pub absent_field_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub updated_at: String,
    pub folder_name: String,
    pub source_sha256: String,
    pub label_index: Option<u32>,
    pub tool_versions: ToolVersions,
    pub paths: ProcessPaths,
    pub counts: ProcessCounts,
    pub absent_fields: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_every_overlay_key_once() {
        assert_eq!(FieldKey::ALL.len(), 56);
        let mut names = FieldKey::ALL
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<&str>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FieldKey::ALL.len());
    }

    #[test]
    fn parse_round_trips_key_names() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::parse(key.as_str()), Some(*key));
        }
        assert_eq!(FieldKey::parse("NOTAKEY"), None);
    }

    #[test]
    fn new_map_holds_every_key_absent() {
        let map = FieldMap::new();
        assert_eq!(map.len(), FieldKey::ALL.len());
        assert_eq!(map.populated_count(), 0);
        assert!(map.iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn set_folds_line_breaks() {
        let mut map = FieldMap::new();
        map.set_str(FieldKey::Byr1Nam1, "John\n  Smith\r\n");
        assert_eq!(map.get(FieldKey::Byr1Nam1), Some("John Smith"));
    }

    #[test]
    fn serializes_absent_values_as_null_in_key_order() {
        let mut map = FieldMap::new();
        map.set_str(FieldKey::County, "DeSoto");
        let json = serde_json::to_string(&map).expect("field map should serialize");
        assert!(json.starts_with(r#"{"COUNTY":"DeSoto","SLR1ADR1":null"#));
        assert!(json.ends_with(r#""COMPCT":null}"#));
    }
}
