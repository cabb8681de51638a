use super::*;

const SETTLEMENT_ANCHOR: &str = "Home is to close on or before";

static DATE_IN_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").expect("date regex"));

#[derive(Debug)]
pub(super) struct TermPatterns {
    buyer_agent_commission: Regex,
}

impl TermPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            buyer_agent_commission: compile(
                r"buyer['’]s agent compensation of\s+(\d+)%",
                "buyer agent commission",
            )?,
        })
    }

    /// Listing-side percentage plus the buyer-agent percentage, if one is stated.
    pub fn commission(&self, collapsed: &str, listing_pct: f64) -> String {
        let buyer_pct = self
            .buyer_agent_commission
            .captures(collapsed)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse::<f64>().ok());

        match buyer_pct {
            Some(buyer_pct) => format_percent(listing_pct + buyer_pct),
            None => format_percent(listing_pct),
        }
    }
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}%")
    } else {
        format!("{value}%")
    }
}

/// Settlement date from the raw text.
///
/// The template renders the closing date next to several other stamps in one
/// jumbled run. Tokens after the anchor are scanned up to the first one with
/// more than four slashes; every `M/D/YYYY` in that span is a candidate and
/// the latest valid calendar date wins. Candidates that do not parse rank
/// below every valid date.
pub(super) fn extract_settlement_date(raw_text: &str) -> Option<String> {
    let start = raw_text.find(SETTLEMENT_ANCHOR)? + SETTLEMENT_ANCHOR.len();
    let after = &raw_text[start..];

    let mut block = Vec::<&str>::new();
    let mut terminated = false;
    for token in after.split_whitespace() {
        block.push(token);
        if token.matches('/').count() > 4 {
            terminated = true;
            break;
        }
    }
    if !terminated {
        debug!("settlement date block not found after anchor");
        return None;
    }

    let filtered = block
        .join(" ")
        .chars()
        .map(|character| {
            if character.is_ascii_digit() || character == '/' {
                character
            } else {
                ' '
            }
        })
        .collect::<String>();

    let mut best: Option<(&str, Option<NaiveDate>)> = None;
    for candidate in DATE_IN_BLOCK.find_iter(&filtered) {
        let text = candidate.as_str();
        let parsed = NaiveDate::parse_from_str(text, "%m/%d/%Y").ok();
        match best {
            Some((_, best_date)) if parsed <= best_date => {}
            _ => best = Some((text, parsed)),
        }
    }

    best.map(|(text, _)| text.to_string())
}
