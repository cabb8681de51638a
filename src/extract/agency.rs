use super::*;

const AGENCY_STATES: &str = "MISSISSIPPI|MS|TENNESSEE|TN|TEXAS|TX";

#[derive(Debug)]
pub(super) struct AgencyPatterns {
    section: Regex,
    listing_block: Regex,
    selling_block: Regex,
    selling_address: Regex,
    selling_zip: Regex,
}

impl AgencyPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            section: compile(
                r"AGENCY DISCLOSURE\s*-\s*\(check one\):(.*?)(?:13\.\s*ARBITRATION|14\.\s*ARBITRATION|SIGNING BELOW|BY SIGNING BELOW|Property Condition Disclosure|$)",
                "agency disclosure section",
            )?,
            listing_block: compile(
                r"Listing Agency\s*(.*?)(?:Selling Agency|$)",
                "listing agency block",
            )?,
            selling_block: compile(
                r"Selling Agency\s*(.*?)(?:13\.\s*ARBITRATION|14\.\s*ARBITRATION|Revised\s+\d{2}/\d{2}/\d{2}|$)",
                "selling agency block",
            )?,
            selling_address: compile(
                &format!(
                    r"Address:\s*([\w\s.\d#-]+(?:Street|Parkway|Road|Rd)?(?:,\s*#?\w+)?)\s*,\s*([A-Za-z\s'-]+?)\s*,\s*({AGENCY_STATES})(?:,\s*(\d{{5}})(?:,\s*United States of America)?)?"
                ),
                "selling agency address",
            )?,
            selling_zip: compile(
                &format!(r"(?:{AGENCY_STATES})(?:,\s*United States of America)?\s*(\d{{5}})"),
                "selling agency zip",
            )?,
        })
    }

    /// Listing and selling sub-blocks of the agency disclosure. When the
    /// disclosure heading is missing the whole text is searched instead.
    pub fn isolate_blocks(&self, collapsed: &str) -> (String, String) {
        let section = capture_block(&self.section, collapsed).unwrap_or_else(|| {
            debug!("agency disclosure section not found; searching whole text");
            collapsed.to_string()
        });

        let listing = capture_block(&self.listing_block, &section).unwrap_or_default();
        let selling = capture_block(&self.selling_block, &section).unwrap_or_default();
        (listing, selling)
    }

    /// AG702AD1 / AG702AD2, rebuilt from the comma-separated address line.
    pub fn extract_selling_address(&self, selling_block: &str, fields: &mut FieldMap) {
        if selling_block.is_empty() {
            return;
        }

        let Some(captures) = self.selling_address.captures(selling_block) else {
            debug!("selling agency address not found");
            return;
        };

        let street = captures
            .get(1)
            .map(|value| value.as_str().trim().to_string());
        let city = captures
            .get(2)
            .map(|value| value.as_str().trim().replace(',', ""))
            .unwrap_or_default();
        let state = normalize_state(captures.get(3).map(|value| value.as_str()))
            .unwrap_or_default();

        let zip = captures
            .get(4)
            .map(|value| value.as_str().trim().to_string())
            .or_else(|| {
                self.selling_zip
                    .captures(selling_block)
                    .and_then(|captures| captures.get(1))
                    .map(|value| value.as_str().trim().to_string())
            });

        fields.set(FieldKey::Ag702Ad1, street);
        fields.set(
            FieldKey::Ag702Ad2,
            Some(match zip {
                Some(zip) => format!("{city}, {state} {zip}"),
                None => format!("{city}, {state}"),
            }),
        );
    }
}

/// Declarative rules for the agent name, phone, email and licence fields.
pub(super) fn agency_rules() -> Result<Vec<ExtractionRule>> {
    use PostProcess::*;
    use Scope::*;

    Ok(vec![
        ExtractionRule::new(
            FieldKey::Ag701Nam,
            ListingBlock,
            &[r"Listing Agent\s+([\w\s,-]+?)\s*Business Phone"],
            StripCommas,
        )?,
        ExtractionRule::new(
            FieldKey::Ag701Mo,
            ListingBlock,
            &[r"Listing Agent\s+[\w\s,-]+?Business Phone\s*([()\d\s-]+?)\s*(?:Address|Email)"],
            Phone,
        )?,
        ExtractionRule::new(
            FieldKey::Ag701Email,
            ListingBlock,
            &[r"Email\s+([\w.@-]+?)(?:\s+License #:\s*Agent|\s*$)"],
            Verbatim,
        )?,
        ExtractionRule::new(
            FieldKey::Ag701ContLic,
            ListingBlock,
            &[r"License #:\s*Agent\s*(.*?)(?:Selling Agency|$)"],
            Verbatim,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Frm,
            SellingBlock,
            &[r"^([\w\s.,'&@#-]+?)\s*(?:Selling Agent|Business Phone)"],
            Verbatim,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Lic,
            SellingBlock,
            &[r"License #:\s*Firm\s*([S\d][\w-]+?)(?:\s*License #:\s*Agent|\s*Email:|$)"],
            StripSpaces,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Ph,
            SellingBlock,
            &[r"Business Phone\s*([()\d\s-]+?)(?:\s+Address:|\s+Selling Agent)"],
            Phone,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Nam,
            SellingBlock,
            &[r"Selling Agent\s+([\w\s,-]+?)\s*,?Business Phone"],
            StripCommas,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Mo,
            SellingBlock,
            &[r"Selling Agent\s+[\w\s,-]+?Business Phone\s*([()\d\s-]+?)\s*(?:Address|Email)"],
            Phone,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702Email,
            SellingBlock,
            &[r"Email:\s*([\w.@-]+)"],
            Verbatim,
        )?,
        ExtractionRule::new(
            FieldKey::Ag702ContLic,
            Collapsed,
            &[
                r"Selling Agency.*?License #:\s*Firm\s*(?:S-)?\d[\w-]*\s*License #:\s*Agent\s*(.{1,20}?)\s*\d{1,2}\.\s*ARBITRATION",
                r"Selling Agency.*?License #:\s*Agent\s*(.{1,20}?)\s*\d{1,2}\.\s*ARBITRATION",
            ],
            Verbatim,
        )?,
    ])
}
