use once_cell::sync::Lazy;
use regex::Regex;

static ENVELOPE_ID_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Docusign Envelope ID: [\w-]+\s*\x0C?").expect("envelope id regex")
});

/// Envelope stamp embedded mid-capture, running up to the next page break.
static ENVELOPE_ID_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)Docusign Envelope ID:.*?\x0C").expect("envelope span regex")
});

static DIGITAL_CONTROL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|[\w-]+DigitalControl_\w+\s*").expect("digital control regex")
});

static PIPE_BOTH_SIDES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\|\s+").expect("pipe regex"));
static PIPE_TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\s+").expect("pipe regex"));
static PIPE_LEADING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\|").expect("pipe regex"));

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("space regex"));

/// Removes e-signature boilerplate and pipe separators, keeping multi-space
/// runs intact.
pub fn normalize_initial(raw: Option<&str>) -> Option<String> {
    let text = raw?;
    let text = ENVELOPE_ID_LINE.replace_all(text, "");
    let text = DIGITAL_CONTROL.replace_all(&text, " ");
    let text = PIPE_BOTH_SIDES.replace_all(&text, " ");
    let text = PIPE_TRAILING_SPACE.replace_all(&text, " ");
    let text = PIPE_LEADING_SPACE.replace_all(&text, " ");
    Some(text.trim().to_string())
}

pub fn collapse_spaces(text: Option<&str>) -> Option<String> {
    text.map(|text| MULTI_SPACE.replace_all(text, " ").into_owned())
}

pub fn normalize_globally(raw: Option<&str>) -> Option<String> {
    collapse_spaces(normalize_initial(raw).as_deref())
}

/// Cleanup re-applied to every captured value.
pub(super) fn clean_capture(captured: &str) -> String {
    let value = ENVELOPE_ID_SPAN.replace_all(captured.trim(), "");
    let value = DIGITAL_CONTROL.replace_all(value.trim(), " ");
    MULTI_SPACE
        .replace_all(value.trim(), " ")
        .trim()
        .to_string()
}

/// Both normalized variants of one document.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub sensitive: String,
    pub collapsed: String,
}

impl NormalizedText {
    pub fn from_raw(raw: &str) -> Self {
        let sensitive = normalize_initial(Some(raw)).unwrap_or_default();
        let collapsed = collapse_spaces(Some(&sensitive)).unwrap_or_default();
        Self {
            sensitive,
            collapsed,
        }
    }
}
