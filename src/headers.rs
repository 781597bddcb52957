//! Raw CSV header to canonical field name mapping.

/// Explicit header mapping for the Electric Vehicle Population export.
pub const HEADER_MAP: [(&str, &str); 17] = [
    ("2020 Census Tract", "censusTract"),
    ("Base MSRP", "baseMSRP"),
    ("Clean Alternative Fuel Vehicle (CAFV) Eligibility", "cafvEligibility"),
    ("DOL Vehicle ID", "dolVehicleId"),
    ("Electric Range", "electricRange"),
    ("Electric Utility", "electricUtility"),
    ("Electric Vehicle Type", "vehicleType"),
    ("Legislative District", "legislativeDistrict"),
    ("Make", "make"),
    ("Model", "model"),
    ("Model Year", "modelYear"),
    ("Postal Code", "postalCode"),
    ("State", "state"),
    ("VIN (1-10)", "vin"),
    ("Vehicle Location", "location"),
    ("City", "city"),
    ("County", "county"),
];

/// Canonical field name for a raw header.
///
/// The explicit mapping only matches the header exactly as exported. Any
/// other header, including a mapped one with stray padding, falls back to the
/// header with all whitespace removed, lower-cased.
pub fn canonical_field(header: &str) -> String {
    match HEADER_MAP.iter().find(|(raw, _)| *raw == header) {
        Some((_, canonical)) => (*canonical).to_string(),
        None => header
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_headers_use_canonical_names() {
        assert_eq!(canonical_field("Electric Range"), "electricRange");
        assert_eq!(canonical_field("VIN (1-10)"), "vin");
        assert_eq!(canonical_field("Base MSRP"), "baseMSRP");
    }

    #[test]
    fn padded_headers_miss_the_explicit_mapping() {
        assert_eq!(canonical_field(" City "), "city");
        assert_eq!(canonical_field(" Model Year"), "modelyear");
        assert_eq!(canonical_field("Electric Range "), "electricrange");
    }

    #[test]
    fn unmapped_headers_fall_back_to_compact_lowercase() {
        assert_eq!(canonical_field("Fuel Cell Type"), "fuelcelltype");
        assert_eq!(canonical_field("Odometer\tReading"), "odometerreading");
        assert_eq!(canonical_field("ID"), "id");
    }
}
