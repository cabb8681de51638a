use super::*;

/// Compiles an extraction pattern with case-insensitive, dot-matches-newline
/// semantics.
pub(super) fn compile(pattern: &str, what: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .with_context(|| format!("failed to compile {what} regex"))
}

/// First match of `pattern` in `haystack`, cleaned of signature boilerplate
/// and collapsed. `None` on no match, a non-participating group, or an empty
/// haystack.
pub fn search_and_extract(pattern: &Regex, haystack: &str, group: usize) -> Option<String> {
    if haystack.is_empty() {
        return None;
    }

    let captures = pattern.captures(haystack)?;
    let value = captures.get(group)?;
    Some(clean_capture(value.as_str()))
}

/// Which text an extraction rule reads.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum Scope {
    Collapsed,
    ListingBlock,
    SellingBlock,
}

/// Texts available to rules for one document. `sensitive` is read directly by
/// the buyer-name extraction.
#[derive(Debug, Default)]
pub(super) struct Scopes {
    pub sensitive: String,
    pub collapsed: String,
    pub listing_block: String,
    pub selling_block: String,
}

impl Scopes {
    pub fn get(&self, scope: Scope) -> &str {
        match scope {
            Scope::Collapsed => &self.collapsed,
            Scope::ListingBlock => &self.listing_block,
            Scope::SellingBlock => &self.selling_block,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum PostProcess {
    Verbatim,
    Phone,
    Currency,
    StripCommas,
    StripSpaces,
}

impl PostProcess {
    fn apply(self, value: String) -> Option<String> {
        match self {
            Self::Verbatim => Some(value),
            Self::Phone => clean_phone(Some(&value)),
            Self::Currency => clean_currency(Some(&value)),
            Self::StripCommas => Some(value.replace(',', "").trim().to_string()),
            Self::StripSpaces => Some(value.replace(' ', "")),
        }
    }
}

/// One field, an ordered list of patterns (primary first, then fallbacks),
/// and the cleanup applied to the winning capture.
#[derive(Debug)]
pub(super) struct ExtractionRule {
    pub field: FieldKey,
    pub scope: Scope,
    pub patterns: Vec<Regex>,
    pub group: usize,
    pub post: PostProcess,
}

impl ExtractionRule {
    pub fn new(field: FieldKey, scope: Scope, patterns: &[&str], post: PostProcess) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| compile(pattern, field.as_str()))
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self {
            field,
            scope,
            patterns,
            group: 1,
            post,
        })
    }

    pub fn evaluate(&self, scopes: &Scopes) -> Option<String> {
        let haystack = scopes.get(self.scope);
        self.patterns
            .iter()
            .find_map(|pattern| search_and_extract(pattern, haystack, self.group))
            .and_then(|value| self.post.apply(value))
    }
}

/// Keeps digits only; length and format are not checked.
pub fn clean_phone(phone: Option<&str>) -> Option<String> {
    let phone = phone?;
    if phone.is_empty() {
        return None;
    }
    Some(phone.chars().filter(char::is_ascii_digit).collect())
}

pub fn clean_currency(amount: Option<&str>) -> Option<String> {
    let amount = amount?;
    if amount.is_empty() {
        return None;
    }
    Some(amount.replace(['$', ','], "").trim().to_string())
}

/// Canonical two-letter state code.
///
/// Unrecognized input longer than two characters is truncated to its first two
/// characters rather than rejected.
pub fn normalize_state(state: Option<&str>) -> Option<String> {
    let state = state?;
    if state.is_empty() {
        return None;
    }

    let upper = PAGE_BREAK_PADDING
        .replace_all(&state.trim().to_uppercase(), "")
        .into_owned();

    for (full_name, code) in [("MISSISSIPPI", "MS"), ("TENNESSEE", "TN"), ("TEXAS", "TX")] {
        if upper.contains(full_name) || upper == code {
            return Some(code.to_string());
        }
    }

    if upper.chars().count() == 2 {
        return Some(upper);
    }

    let truncated = state.trim().chars().take(2).collect::<String>().to_uppercase();
    debug!(input = state, code = %truncated, "unrecognized state name truncated");
    Some(truncated)
}

static PAGE_BREAK_PADDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\x0C\s*").expect("page break regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_and_extract_returns_none_for_empty_haystack_and_missing_group() {
        let pattern = compile(r"Price\s*(\d+)(x)?", "test").expect("regex");
        assert_eq!(search_and_extract(&pattern, "", 1), None);
        assert_eq!(search_and_extract(&pattern, "Price 10", 2), None);
        assert_eq!(search_and_extract(&pattern, "Price 10", 3), None);
        assert_eq!(search_and_extract(&pattern, "no match", 1), None);
    }

    #[test]
    fn search_and_extract_is_case_insensitive_and_spans_lines() {
        let pattern = compile(r"seller\s+(.*?)\s+end", "test").expect("regex");
        let haystack = "SELLER Legacy   New\nHomes END";
        assert_eq!(
            search_and_extract(&pattern, haystack, 1).as_deref(),
            Some("Legacy New\nHomes")
        );
    }

    #[test]
    fn rule_falls_back_in_order() {
        let rule = ExtractionRule::new(
            FieldKey::Deposit,
            Scope::Collapsed,
            &[r"first\s+\$([\d,.]+)", r"second\s+\$([\d,.]+)"],
            PostProcess::Currency,
        )
        .expect("rule");
        let scopes = Scopes {
            collapsed: "second $1,500.00 first $2,000.00".to_string(),
            ..Scopes::default()
        };
        assert_eq!(rule.evaluate(&scopes).as_deref(), Some("2000.00"));

        let scopes = Scopes {
            collapsed: "second $1,500.00".to_string(),
            ..Scopes::default()
        };
        assert_eq!(rule.evaluate(&scopes).as_deref(), Some("1500.00"));
    }

    #[test]
    fn phone_cleanup_keeps_malformed_digit_strings() {
        assert_eq!(clean_phone(Some("(662) 555-0101")).as_deref(), Some("6625550101"));
        assert_eq!(clean_phone(Some("55-01")).as_deref(), Some("5501"));
        assert_eq!(clean_phone(Some("( ) -")).as_deref(), Some(""));
        assert_eq!(clean_phone(None), None);
    }

    #[test]
    fn currency_cleanup_drops_symbol_and_separators() {
        assert_eq!(clean_currency(Some("$350,000.00")).as_deref(), Some("350000.00"));
        assert_eq!(clean_currency(None), None);
    }

    #[test]
    fn state_names_map_to_codes() {
        assert_eq!(normalize_state(Some("Mississippi")).as_deref(), Some("MS"));
        assert_eq!(normalize_state(Some("tn")).as_deref(), Some("TN"));
        assert_eq!(normalize_state(Some("TEXAS\x0C")).as_deref(), Some("TX"));
        assert_eq!(normalize_state(Some("al")).as_deref(), Some("AL"));
        assert_eq!(normalize_state(Some("Arkansas")).as_deref(), Some("AR"));
        assert_eq!(normalize_state(None), None);
    }
}
