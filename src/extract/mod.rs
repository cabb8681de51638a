//! Field extraction for Legacy purchase contracts.
//!
//! Raw text is normalized into a whitespace-preserving and a collapsed variant,
//! then each field group runs independently against the variant it needs.
//! A pattern miss leaves the field absent; nothing here fails on bad input.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::config::FirmProfile;
use crate::model::{FieldKey, FieldMap};

mod agency;
mod normalize;
mod parties;
mod property;
mod rules;
mod terms;
#[cfg(test)]
mod tests;

pub use normalize::{NormalizedText, collapse_spaces, normalize_globally, normalize_initial};
pub use rules::{clean_currency, clean_phone, normalize_state, search_and_extract};

use agency::*;
use normalize::clean_capture;
use parties::*;
use property::*;
use rules::*;
use terms::*;

/// Compiled rule set for one firm profile.
#[derive(Debug)]
pub struct FieldExtractor {
    profile: FirmProfile,
    scalar_rules: Vec<ExtractionRule>,
    parties: PartyPatterns,
    property: PropertyPatterns,
    agency: AgencyPatterns,
    terms: TermPatterns,
}

impl FieldExtractor {
    pub fn new(profile: &FirmProfile) -> Result<Self> {
        let seller = entity_pattern(&profile.seller_entity);
        let seller_name = format!(r"Parties\s*-\s*({seller}.*?)\s*hereafter called SELLER");
        let deposit_primary = format!(r"Deposit held by\s*{seller}\s*\$?([\d,]+\.\d{{2}})");
        let deposit_fallback = format!(r"DEPOSIT Held by\s+{seller}\s*\$?([\d,]+\.\d{{2}})");

        let mut scalar_rules = vec![
            ExtractionRule::new(
                FieldKey::Slr1Nam1,
                Scope::Collapsed,
                &[seller_name.as_str()],
                PostProcess::Verbatim,
            )?,
            ExtractionRule::new(
                FieldKey::SalePric,
                Scope::Collapsed,
                &[r"Full Purchase Price\s*\$?([\d,]+\.\d{2})"],
                PostProcess::Currency,
            )?,
            ExtractionRule::new(
                FieldKey::Deposit,
                Scope::Collapsed,
                &[deposit_primary.as_str(), deposit_fallback.as_str()],
                PostProcess::Currency,
            )?,
        ];
        scalar_rules.extend(agency_rules()?);

        Ok(Self {
            profile: profile.clone(),
            scalar_rules,
            parties: PartyPatterns::new()?,
            property: PropertyPatterns::new()?,
            agency: AgencyPatterns::new()?,
            terms: TermPatterns::new()?,
        })
    }

    pub fn profile(&self) -> &FirmProfile {
        &self.profile
    }

    /// Builds the full field map for one document. Every vocabulary key is
    /// present in the result, matched or not.
    pub fn extract_fields(&self, raw_text: &str) -> FieldMap {
        let mut fields = FieldMap::new();
        apply_profile_constants(&self.profile, &mut fields);

        let normalized = NormalizedText::from_raw(raw_text);
        let (listing_block, selling_block) = self.agency.isolate_blocks(&normalized.collapsed);
        let scopes = Scopes {
            sensitive: normalized.sensitive,
            collapsed: normalized.collapsed,
            listing_block,
            selling_block,
        };

        for rule in &self.scalar_rules {
            let value = rule.evaluate(&scopes);
            if value.is_none() {
                debug!(field = rule.field.as_str(), "no match");
            }
            fields.set(rule.field, value);
        }

        fields.set(FieldKey::SettDate, extract_settlement_date(raw_text));
        fields.set(
            FieldKey::CompCt,
            Some(self.terms.commission(
                &scopes.collapsed,
                self.profile.listing_commission_pct,
            )),
        );

        self.parties.extract_buyer_names(&scopes.sensitive, &mut fields);
        self.parties.extract_buyer_contacts(&scopes.collapsed, &mut fields);
        self.property.extract(&scopes.collapsed, &mut fields);
        self.agency
            .extract_selling_address(&scopes.selling_block, &mut fields);

        debug!(
            populated = fields.populated_count(),
            total = fields.len(),
            "field extraction finished"
        );
        fields
    }
}

/// Convenience wrapper over a default-profile extractor.
pub fn extract_fields(raw_text: &str) -> Result<FieldMap> {
    let extractor = FieldExtractor::new(&FirmProfile::default())?;
    Ok(extractor.extract_fields(raw_text))
}

fn apply_profile_constants(profile: &FirmProfile, fields: &mut FieldMap) {
    fields.set_str(FieldKey::County, &profile.county);
    fields.set_str(FieldKey::Slr1Adr1, &profile.seller_address_line1);
    fields.set_str(FieldKey::Slr1Adr2, &profile.seller_address_line2);
    fields.set_str(FieldKey::Ag701Frm, &profile.listing_firm_name);
    fields.set_str(FieldKey::Ag701Lic, &profile.listing_firm_license);
    fields.set_str(FieldKey::Ag701Ad1, &profile.listing_firm_address_line1);
    fields.set_str(FieldKey::Ag701Ad2, &profile.listing_firm_address_line2);
    fields.set_str(FieldKey::Ag701Ph, &profile.listing_firm_phone);
    fields.set_str(FieldKey::InCity, &profile.in_city);
    fields.set_str(FieldKey::InCounty, &profile.in_county);
    fields.set_str(FieldKey::DepHeld, &profile.deposit_held_by);
    fields.set_str(FieldKey::Possion, &profile.possession);
    fields.set_str(FieldKey::UndName, &profile.underwriter);
    fields.set_str(FieldKey::Slr1Rel1, &profile.seller_relation);
    fields.set_str(FieldKey::PListingAgent, &profile.listing_agent_commission);
    fields.set_str(FieldKey::MtdtType, &profile.mortgage_instrument);
}

/// Pattern for an entity name that tolerates the spacing and comma drift the
/// template shows ("HOMES,LLC" vs "Homes, LLC").
fn entity_pattern(name: &str) -> String {
    let words = name
        .split(|character: char| character.is_whitespace() || character == ',')
        .filter(|word| !word.is_empty())
        .map(regex::escape)
        .collect::<Vec<String>>();

    if words.is_empty() {
        return r"[^\n]*?".to_string();
    }
    words.join(r"[\s,]*")
}

/// Group 1 of the first match, trimmed but otherwise untouched.
fn capture_block(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim().to_string())
}
