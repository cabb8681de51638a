use super::*;

const STATES: &str = "MS|TN|TX|MISSISSIPPI|TENNESSEE|TEXAS";
const STREET_SUFFIXES: &str =
    "Street|St|Road|Rd|Drive|Dr|Avenue|Ave|Lane|Ln|Cove|Cv|Court|Ct|Place|Pl|Boulevard|Blvd";

#[derive(Debug)]
pub(super) struct PartyPatterns {
    title_block: Regex,
    and_separator: Regex,
    wide_gap: Regex,
    contact_block: Regex,
    contact_record: Regex,
    contact_record_fallback: Regex,
}

impl PartyPatterns {
    pub fn new() -> Result<Self> {
        let contact_tail = format!(
            r"\s+([A-Za-z\s'-]+?)\s+({STATES})\s+(\d{{5}})\s*\(?(\d{{3}})\)?\s*(\d{{3}}-\d{{4}})\s+([\w.@-]+)"
        );

        Ok(Self {
            title_block: compile(
                r"wishes to take title as follows:\s*(.*?)(?:\s*Please List whether BUYER is:|\s*Single Person|\s*Married Person|\s*Investor|$)",
                "buyer title block",
            )?,
            and_separator: compile(r"\s+and\s+", "co-buyer separator")?,
            wide_gap: compile(r"\s{3,}", "co-buyer column gap")?,
            contact_block: compile(
                r"hereafter called BUYER\(s\), whose address, phone numbers, and email address(?:es)? are listed below\s*(.*?)\s*hereby agree",
                "buyer contact block",
            )?,
            contact_record: compile(
                &format!(r"(\d+[\w\s.,#-]*?(?:{STREET_SUFFIXES})){contact_tail}"),
                "buyer contact record",
            )?,
            contact_record_fallback: compile(
                &format!(r"(\d+[\w\s.,#-]*?\s\w+){contact_tail}"),
                "buyer contact record fallback",
            )?,
        })
    }

    /// BYR1NAM1 / BYR1NAM2 / BYR1REL1 from the title-taking clause.
    ///
    /// Co-buyers are separated either by a literal "and" or, in the form's
    /// two-column layout, by a run of three or more spaces; this is why the
    /// whitespace-preserving text is used.
    pub fn extract_buyer_names(&self, sensitive: &str, fields: &mut FieldMap) {
        fields.set_str(FieldKey::Byr1Rel1, "");

        let Some(raw_names) = capture_block(&self.title_block, sensitive) else {
            debug!("buyer title clause not found");
            return;
        };
        let names = strip_please_artifact(&raw_names);

        let parts = if names.to_lowercase().contains(" and ") {
            self.and_separator.splitn(&names, 2).collect::<Vec<&str>>()
        } else if self.wide_gap.is_match(&names) {
            self.wide_gap.splitn(&names, 2).collect::<Vec<&str>>()
        } else {
            vec![names.as_str()]
        };

        let first = parts.first().map(|name| tidy_name(name));
        let second = parts
            .get(1)
            .map(|name| tidy_name(name))
            .filter(|name| !name.is_empty());

        fields.set(
            FieldKey::Byr1Nam1,
            first.filter(|name| !name.is_empty()),
        );
        if second.is_some() {
            fields.set_str(FieldKey::Byr1Rel1, "and");
        }
        fields.set(FieldKey::Byr1Nam2, second);
    }

    /// Address, phone and email for up to two buyers. The second record only
    /// contributes phone and email.
    pub fn extract_buyer_contacts(&self, collapsed: &str, fields: &mut FieldMap) {
        let Some(block) = self
            .contact_block
            .captures(collapsed)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str())
        else {
            debug!("buyer contact block not found");
            return;
        };

        let mut records = self
            .contact_record
            .captures_iter(block)
            .collect::<Vec<regex::Captures<'_>>>();
        if records.is_empty() {
            records = self
                .contact_record_fallback
                .captures_iter(block)
                .collect();
        }

        let group = |captures: &regex::Captures<'_>, index: usize| {
            captures
                .get(index)
                .map(|value| value.as_str().trim().to_string())
                .unwrap_or_default()
        };

        if let Some(first) = records.first() {
            let state = normalize_state(Some(&group(first, 3))).unwrap_or_default();
            fields.set(FieldKey::Byr1Adr1, Some(group(first, 1)));
            fields.set(
                FieldKey::Byr1Adr2,
                Some(format!("{}, {} {}", group(first, 2), state, group(first, 4))),
            );
            fields.set(
                FieldKey::Byr1Cell1,
                clean_phone(Some(&format!("{}{}", group(first, 5), group(first, 6)))),
            );
            fields.set(FieldKey::Byr1Email, Some(group(first, 7)));
        }

        if let Some(second) = records.get(1) {
            fields.set(
                FieldKey::Byr1Cell2,
                clean_phone(Some(&format!("{}{}", group(second, 5), group(second, 6)))),
            );
            fields.set(FieldKey::Byr1Email2, Some(group(second, 7)));
        }
    }
}

/// Layout extraction sometimes glues the next line's "Please" onto the last
/// name ("SmithPlease"); drop it.
fn strip_please_artifact(names: &str) -> String {
    let trimmed = names.trim();
    if trimmed.len() >= 6 && trimmed.to_ascii_lowercase().ends_with("please") {
        return trimmed[..trimmed.len() - 6].trim().to_string();
    }
    trimmed.to_string()
}

fn tidy_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<&str>>().join(" ")
}
