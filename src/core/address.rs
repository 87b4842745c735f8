use crate::domain::model::PostalAddress;

const MAX_ZIP_LEN: usize = 10;
const REGION_CODE_LEN: usize = 2;
const DEFAULT_COUNTRY: &str = "US";

/// Keeps digits and hyphens only, capped at 10 characters ("12345-6789").
pub fn sanitize_zip(zip: &str) -> String {
    zip.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .take(MAX_ZIP_LEN)
        .collect()
}

pub fn normalize_state(state: &str) -> String {
    state
        .trim()
        .chars()
        .take(REGION_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

pub fn normalize_country(country: Option<&str>) -> String {
    let country = country
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COUNTRY);

    country
        .chars()
        .take(REGION_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Best-effort cleanup before the address leaves for the aggregator. This is
/// not address validation; the aggregator decides whether it is deliverable.
pub fn normalize_destination(address: &PostalAddress) -> PostalAddress {
    PostalAddress {
        name: address.name.trim().to_string(),
        company: address.company.clone(),
        street1: address.street1.clone(),
        street2: address
            .street2
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .cloned(),
        city: address.city.clone(),
        state: normalize_state(&address.state),
        zip: sanitize_zip(&address.zip),
        country: normalize_country(Some(address.country.as_str())),
        phone: address.phone.clone(),
        email: address.email.clone(),
    }
}
