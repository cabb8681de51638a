//! Display names and folder names derived from the extracted buyer names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{FieldKey, FieldMap};

const COMPANY_MARKERS: [&str; 7] = ["home", "prop", "llc", "inc", "custom", "build", "dev"];

pub const UNKNOWN_ENTITY: &str = "Unknown_Entity";

static PATH_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("path character regex"));

/// A raw name split into surname and given names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub first: Option<String>,
    pub last: String,
}

/// "Last, First" splits on the first comma; otherwise the last whitespace token
/// is the surname. A single token has no given name.
pub fn decompose_name(raw: &str) -> NameParts {
    let raw = raw.trim();

    if let Some((last, first)) = raw.split_once(',') {
        let first = first.trim();
        return NameParts {
            first: (!first.is_empty()).then(|| first.to_string()),
            last: last.trim().to_string(),
        };
    }

    let tokens = raw.split_whitespace().collect::<Vec<&str>>();
    match tokens.split_last() {
        Some((last, given)) if !given.is_empty() => NameParts {
            first: Some(given.join(" ")),
            last: (*last).to_string(),
        },
        Some((last, _)) => NameParts {
            first: None,
            last: (*last).to_string(),
        },
        None => NameParts {
            first: None,
            last: String::new(),
        },
    }
}

/// Substring test, so person names that happen to contain a marker are
/// treated as companies too.
pub fn is_company_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    COMPANY_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Canonical client display name.
///
/// Companies come back uppercased and `name2` is ignored. One person renders
/// as `LAST, First`; two people sharing a surname as `LAST, First1 & First2`;
/// otherwise `LAST1 & LAST2, First1 First2`.
pub fn format_name(name1: &str, name2: Option<&str>) -> String {
    let name1 = name1.trim();
    let name2 = name2.map(str::trim).filter(|name| !name.is_empty());

    if is_company_name(name1) {
        return name1.to_uppercase();
    }

    if name1.is_empty() {
        return name2.map(single_name).unwrap_or_default();
    }

    let Some(name2) = name2 else {
        return single_name(name1);
    };

    let first = decompose_name(name1);
    let second = decompose_name(name2);
    let first_given = first.first.unwrap_or_default();
    let second_given = second.first.unwrap_or_default();

    if first.last.eq_ignore_ascii_case(&second.last) {
        let given = [first_given, second_given]
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect::<Vec<String>>()
            .join(" & ");
        return join_last_first(&first.last.to_uppercase(), &given);
    }

    let given = format!("{first_given} {second_given}").trim().to_string();
    join_last_first(
        &format!(
            "{} & {}",
            first.last.to_uppercase(),
            second.last.to_uppercase()
        ),
        &given,
    )
}

fn single_name(name: &str) -> String {
    let parts = decompose_name(name);
    join_last_first(
        &parts.last.to_uppercase(),
        parts.first.as_deref().unwrap_or_default(),
    )
}

fn join_last_first(last: &str, first: &str) -> String {
    if first.is_empty() {
        last.to_string()
    } else {
        format!("{last}, {first}")
    }
}

/// Proposed client folder name from BYR1NAM1, with `suffix` appended.
pub fn generate_folder_name(fields: &FieldMap, suffix: &str) -> String {
    let Some(buyer) = fields
        .get(FieldKey::Byr1Nam1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return format!("{UNKNOWN_ENTITY}{suffix}");
    };

    let parts = decompose_name(buyer);
    let last = strip_path_illegal(&parts.last);
    let first = strip_path_illegal(parts.first.as_deref().unwrap_or_default());

    if first.is_empty() {
        format!("{last}{suffix}")
    } else {
        format!("{last}, {first}{suffix}")
    }
}

pub fn strip_path_illegal(value: &str) -> String {
    PATH_ILLEGAL.replace_all(value, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = "  25-";

    #[test]
    fn company_short_circuits_second_name() {
        assert_eq!(
            format_name("LEGACY HOMES LLC", Some("Anything")),
            "LEGACY HOMES LLC"
        );
        assert_eq!(format_name("Acme Builders", None), "ACME BUILDERS");
        assert_eq!(format_name("Devon Price", None), "DEVON PRICE");
    }

    #[test]
    fn single_person_forms() {
        assert_eq!(format_name("Smith, John", None), "SMITH, John");
        assert_eq!(format_name("John Smith", None), "SMITH, John");
        assert_eq!(format_name("Mary Ann Smith", Some("  ")), "SMITH, Mary Ann");
        assert_eq!(format_name("Cher", None), "CHER");
    }

    #[test]
    fn shared_surname_merges_given_names() {
        assert_eq!(
            format_name("John Smith", Some("Jane smith")),
            "SMITH, John & Jane"
        );
    }

    #[test]
    fn different_surnames_pair_up() {
        assert_eq!(
            format_name("John Smith", Some("Jane Doe")),
            "SMITH & DOE, John Jane"
        );
        assert_eq!(format_name("Smith", Some("Jane Doe")), "SMITH & DOE, Jane");
    }

    #[test]
    fn empty_first_name_falls_back_to_second() {
        assert_eq!(format_name("", Some("Jane Doe")), "DOE, Jane");
        assert_eq!(format_name("", None), "");
    }

    #[test]
    fn decomposition_rules() {
        assert_eq!(
            decompose_name("Smith, John Q"),
            NameParts {
                first: Some("John Q".to_string()),
                last: "Smith".to_string()
            }
        );
        assert_eq!(
            decompose_name("Prince"),
            NameParts {
                first: None,
                last: "Prince".to_string()
            }
        );
        assert_eq!(decompose_name("Smith,").first, None);
    }

    #[test]
    fn folder_name_from_buyer() {
        let mut fields = FieldMap::new();
        fields.set_str(FieldKey::Byr1Nam1, "John Smith");
        assert_eq!(generate_folder_name(&fields, SUFFIX), "Smith, John  25-");

        fields.set_str(FieldKey::Byr1Nam1, "Smith, John");
        assert_eq!(generate_folder_name(&fields, SUFFIX), "Smith, John  25-");

        fields.set_str(FieldKey::Byr1Nam1, "Prince");
        assert_eq!(generate_folder_name(&fields, SUFFIX), "Prince  25-");
    }

    #[test]
    fn folder_name_strips_path_characters() {
        let mut fields = FieldMap::new();
        fields.set_str(FieldKey::Byr1Nam1, "Jo/hn O'Ne:al?");
        assert_eq!(generate_folder_name(&fields, SUFFIX), "O'Neal, John  25-");
    }

    #[test]
    fn absent_buyer_uses_sentinel() {
        let fields = FieldMap::new();
        assert_eq!(generate_folder_name(&fields, SUFFIX), "Unknown_Entity  25-");

        let mut fields = FieldMap::new();
        fields.set_str(FieldKey::Byr1Nam1, "   ");
        assert_eq!(generate_folder_name(&fields, SUFFIX), "Unknown_Entity  25-");
    }
}
