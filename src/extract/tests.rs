use super::*;

const CONTRACT: &str = "Docusign Envelope ID: 8C1F2D7A-55B0-4E3A-9D11-0F2A3B4C5D6E\x0C\
REAL ESTATE PURCHASE CONTRACT - NEW CONSTRUCTION\n\
1. Parties - LEGACY NEW HOMES, LLC a Mississippi limited liability company hereafter called SELLER, and\n\
BUYER wishes to take title as follows: John Smith        Jane Smith\n\
Please List whether BUYER is: Single Person Married Person Investor\n\
hereafter called BUYER(s), whose address, phone numbers, and email addresses are listed below\n\
123 Oak Street   Southaven   MS   38671   (662) 555-0101   john@example.com\n\
123 Oak Street   Southaven   MS   38671   (662) 555-0202   jane@example.com\n\
hereby agree to the following terms.\n\
2. Property: Lot 127 Plan/Elevation Aspen B Subdivision Oak Hill Phase 2\n\
Address 1234 Maple Cove   Southaven   MISSISSIPPI   38671\n\
3. Full Purchase Price $350,000.00\n\
4. Deposit held by LEGACY NEW HOMES,LLC $5,000.00\n\
5. Home is to close on or before 06/30/2025|a9-DigitalControl_Date_1 07/15/2025//////\n\
6. Seller agrees to pay buyer’s agent compensation of 3% of the sales price.\n\
12. AGENCY DISCLOSURE - (check one):\n\
Listing Agency Legacy Homes Realty, LLC Listing Agent Pat Rivers, Business Phone (662) 555-1000\n\
Email pat@legacyhomes.com License #: Agent S-55012\n\
Selling Agency Crye-Leike Realtors Selling Agent Dana Cole Business Phone (901) 555-2000\n\
Address: 100 Poplar Parkway, Germantown, TN, 38138, United States of America\n\
Email: dana@crye.com License #: Firm S-12345 License #: Agent 998877\n\
13. ARBITRATION Any dispute shall be settled by arbitration.\n";

fn extract(text: &str) -> FieldMap {
    let extractor = FieldExtractor::new(&FirmProfile::default()).expect("extractor should build");
    extractor.extract_fields(text)
}

#[test]
fn full_contract_populates_every_group() {
    let fields = extract(CONTRACT);

    assert_eq!(
        fields.get(FieldKey::Slr1Nam1),
        Some("LEGACY NEW HOMES, LLC a Mississippi limited liability company")
    );
    assert_eq!(fields.get(FieldKey::SalePric), Some("350000.00"));
    assert_eq!(fields.get(FieldKey::Deposit), Some("5000.00"));
    assert_eq!(fields.get(FieldKey::SettDate), Some("07/15/2025"));
    assert_eq!(fields.get(FieldKey::CompCt), Some("5.0%"));

    assert_eq!(fields.get(FieldKey::Byr1Nam1), Some("John Smith"));
    assert_eq!(fields.get(FieldKey::Byr1Nam2), Some("Jane Smith"));
    assert_eq!(fields.get(FieldKey::Byr1Rel1), Some("and"));
    assert_eq!(fields.get(FieldKey::Byr1Adr1), Some("123 Oak Street"));
    assert_eq!(fields.get(FieldKey::Byr1Adr2), Some("Southaven, MS 38671"));
    assert_eq!(fields.get(FieldKey::Byr1Cell1), Some("6625550101"));
    assert_eq!(fields.get(FieldKey::Byr1Email2), Some("jane@example.com"));

    assert_eq!(fields.get(FieldKey::LotUnit), Some("127"));
    assert_eq!(fields.get(FieldKey::Subdivn), Some("Oak Hill Phase 2"));
    assert_eq!(fields.get(FieldKey::PropStre), Some("1234 Maple Cove"));
    assert_eq!(fields.get(FieldKey::PropCity), Some("Southaven"));
    assert_eq!(fields.get(FieldKey::StateLet), Some("MS"));
    assert_eq!(fields.get(FieldKey::PropZip), Some("38671"));

    assert_eq!(fields.get(FieldKey::Ag701Nam), Some("Pat Rivers"));
    assert_eq!(fields.get(FieldKey::Ag702Frm), Some("Crye-Leike Realtors"));
    assert_eq!(fields.get(FieldKey::Ag702Ad2), Some("Germantown, TN 38138"));
    assert_eq!(fields.get(FieldKey::Ag702ContLic), Some("998877"));
}

#[test]
fn profile_constants_are_written_verbatim() {
    let fields = extract("");
    assert_eq!(fields.get(FieldKey::County), Some("DeSoto"));
    assert_eq!(fields.get(FieldKey::Ag701Frm), Some("Legacy Homes Realty, LLC"));
    assert_eq!(fields.get(FieldKey::Ag701Ph), Some("6629322282"));
    assert_eq!(fields.get(FieldKey::Slr1Rel1), Some(""));
    assert_eq!(fields.get(FieldKey::PListingAgent), Some("2%"));
    assert_eq!(fields.get(FieldKey::MtdtType), Some("Deed of Trust"));
    assert_eq!(fields.get(FieldKey::Slr1Nam2), None);
    assert_eq!(fields.get(FieldKey::ParcelId), None);
}

#[test]
fn custom_profile_drives_constants_and_seller_anchor() {
    let profile = FirmProfile {
        county: "Shelby".to_string(),
        seller_entity: "Acme Builders Inc".to_string(),
        listing_commission_pct: 1.5,
        ..FirmProfile::default()
    };
    let extractor = FieldExtractor::new(&profile).expect("extractor should build");
    let fields = extractor.extract_fields(
        "Parties - ACME BUILDERS, INC hereafter called SELLER. DEPOSIT Held by Acme Builders Inc $1,000.00",
    );

    assert_eq!(fields.get(FieldKey::County), Some("Shelby"));
    assert_eq!(fields.get(FieldKey::Slr1Nam1), Some("ACME BUILDERS, INC"));
    assert_eq!(fields.get(FieldKey::Deposit), Some("1000.00"));
    assert_eq!(fields.get(FieldKey::CompCt), Some("1.5%"));
}

#[test]
fn sale_price_from_minimal_text() {
    let fields = extract("Full Purchase Price $350,000.00");
    assert_eq!(fields.get(FieldKey::SalePric), Some("350000.00"));
}

#[test]
fn settlement_date_reads_raw_text() {
    let fields = extract("Home is to close on or before 01/02/2025 03/04/2025 garbage/////");
    assert_eq!(fields.get(FieldKey::SettDate), Some("03/04/2025"));
}

#[test]
fn garbage_input_still_yields_full_vocabulary() {
    let samples = [
        String::new(),
        "lorem ipsum dolor sit amet, consectetur adipiscing elit".to_string(),
        CONTRACT.chars().take(400).collect::<String>(),
        CONTRACT.chars().skip(900).collect::<String>(),
        "|||| \x0C\x0C $$$ ,,, Lot Subdivision Address MS 1".to_string(),
        "Home is to close on or before".to_string(),
        "wishes to take title as follows:".to_string(),
        "AGENCY DISCLOSURE - (check one): Selling Agency".to_string(),
        "héllo wörld ✓ 日本語 ////// 99/99/9999".to_string(),
    ];

    for sample in samples {
        let fields = extract(&sample);
        assert_eq!(fields.len(), FieldKey::ALL.len(), "sample {sample:?}");
        let keys = fields.iter().map(|(key, _)| key).collect::<Vec<FieldKey>>();
        assert_eq!(keys, FieldKey::ALL.to_vec(), "sample {sample:?}");
    }
}

#[test]
fn unparseable_prose_leaves_extracted_fields_absent() {
    let fields = extract("This document is not a purchase contract.");
    for key in [
        FieldKey::SalePric,
        FieldKey::Deposit,
        FieldKey::SettDate,
        FieldKey::Byr1Nam1,
        FieldKey::Byr1Adr1,
        FieldKey::PropStre,
        FieldKey::Ag701Nam,
        FieldKey::Ag702Frm,
    ] {
        assert_eq!(fields.get(key), None, "{key}");
    }
    assert_eq!(fields.get(FieldKey::CompCt), Some("2.0%"));
}

#[test]
fn entity_pattern_tolerates_comma_and_spacing_drift() {
    let pattern = compile(&entity_pattern("LEGACY NEW HOMES, LLC"), "entity").expect("regex");
    assert!(pattern.is_match("Legacy New Homes, LLC"));
    assert!(pattern.is_match("LEGACY NEW HOMES,LLC"));
    assert!(!pattern.is_match("LEGACY HOMES LLC"));
}

#[test]
fn convenience_wrapper_uses_default_profile() {
    let fields = super::extract_fields("Full Purchase Price $1,250.50").expect("extraction");
    assert_eq!(fields.get(FieldKey::SalePric), Some("1250.50"));
    assert_eq!(fields.get(FieldKey::County), Some("DeSoto"));
}
