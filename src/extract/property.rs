use super::*;

#[derive(Debug)]
pub(super) struct PropertyPatterns {
    primary: Regex,
    fallback: Regex,
}

impl PropertyPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            primary: compile(
                r"Lot\s+([\w\d]+)(?:\s*Plan/Elevation\s+[\w\s\d.-]+?)?\s*Subdivision\s+([\w\s\d.-]+?Phase\s*\d+|[\w\s\d.-]+?Section\s*\w+\s*Phase\s*\d+|[\w\s\d.-]+?)\s*Address\s+([\d\w\s.-]+?(?:Lane|Drive|Road|Cove|Street|St|Ave|Dr))\s+([A-Za-z\s'-]+?)\s+(MISSISSIPPI|MS|TENNESSEE|TN)\s+(\d{5})",
                "property description",
            )?,
            fallback: compile(
                r"Lot\s+([\w\d]+).*?Subdivision\s+(.*?)\s*Address\s+([\d\w\s.-]+)\s+([A-Za-z\s'-]+?)\s+(MISSISSIPPI|MS|TENNESSEE|TN)\s+(\d{5})",
                "property description fallback",
            )?,
        })
    }

    /// LORU, LOTUNIT, SUBDIVN, PROPSTRE, PROPCITY, STATELET, PROPZIP.
    pub fn extract(&self, collapsed: &str, fields: &mut FieldMap) {
        let group = |captures: &regex::Captures<'_>, index: usize| {
            captures
                .get(index)
                .map(|value| value.as_str().trim().to_string())
                .unwrap_or_default()
        };

        let (street, city, captures) = if let Some(captures) = self.primary.captures(collapsed) {
            (group(&captures, 3), group(&captures, 4), captures)
        } else if let Some(captures) = self.fallback.captures(collapsed) {
            let address = group(&captures, 3);
            let city = group(&captures, 4);
            (split_city_from_street(&address, &city), city, captures)
        } else {
            debug!("property description not found");
            return;
        };

        fields.set_str(FieldKey::LorU, "Lot");
        fields.set(FieldKey::LotUnit, Some(group(&captures, 1)));
        fields.set(FieldKey::Subdivn, Some(group(&captures, 2)));
        fields.set(FieldKey::PropStre, Some(street));
        fields.set(FieldKey::PropCity, Some(city));
        fields.set(
            FieldKey::StateLet,
            normalize_state(Some(&group(&captures, 5))),
        );
        fields.set(FieldKey::PropZip, Some(group(&captures, 6)));
    }
}

/// The loose fallback can swallow the city into the street span; cut it off at
/// the last exact occurrence of the city.
fn split_city_from_street(address: &str, city: &str) -> String {
    let contains_city = address.to_lowercase().contains(&city.to_lowercase());
    if !contains_city || address.eq_ignore_ascii_case(city) || city.is_empty() {
        return address.to_string();
    }

    match address.rfind(city) {
        Some(index) if !address[..index].trim().is_empty() => address[..index].trim().to_string(),
        _ => address.to_string(),
    }
}
