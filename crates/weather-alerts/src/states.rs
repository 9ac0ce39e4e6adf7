//! US state names and postal codes
//!
//! NWS area descriptions name states by postal code ("Harris, TX") while
//! subscribers pick full names ("Texas"); both resolve to the same code here.

/// `(name, USPS code)` for the states, DC and the inhabited territories
pub const US_STATES: [(&str, &str); 56] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("American Samoa", "AS"),
    ("Guam", "GU"),
    ("Northern Mariana Islands", "MP"),
    ("Puerto Rico", "PR"),
    ("U.S. Virgin Islands", "VI"),
];

/// Postal code for a state name or code, case-insensitive
pub fn state_code(state: &str) -> Option<&'static str> {
    let state = state.trim();
    US_STATES
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(state) || code.eq_ignore_ascii_case(state))
        .map(|(_, code)| *code)
}

/// Comparable key: the postal code when known, else the lower-cased text
fn state_key(state: &str) -> String {
    match state_code(state) {
        Some(code) => code.to_string(),
        None => state.trim().to_lowercase(),
    }
}

/// State of each `;`-separated zone in an area description, taken from the
/// text after the zone's last comma
pub fn area_state_segments(area_desc: &str) -> impl Iterator<Item = &str> {
    area_desc
        .split(';')
        .filter_map(|zone| zone.rsplit(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Whether any zone of the area description lies in `state`
pub fn area_in_state(area_desc: &str, state: &str) -> bool {
    if state.trim().is_empty() {
        return false;
    }
    let wanted = state_key(state);
    area_state_segments(area_desc).any(|seg| state_key(seg) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code() {
        assert_eq!(state_code("Texas"), Some("TX"));
        assert_eq!(state_code(" tx "), Some("TX"));
        assert_eq!(state_code("west virginia"), Some("WV"));
        assert_eq!(state_code("Atlantis"), None);
    }

    #[test]
    fn test_codes_unique() {
        let codes: std::collections::HashSet<_> = US_STATES.iter().map(|(_, c)| c).collect();
        assert_eq!(codes.len(), US_STATES.len());
    }

    #[test]
    fn test_postal_codes_match_names() {
        assert!(area_in_state("Harris, TX; Fort Bend, TX", "Texas"));
        assert!(area_in_state("Harris, TX; Fort Bend, TX", "TX"));
        assert!(area_in_state("Maricopa; Pinal, Arizona", "Arizona"));
    }

    #[test]
    fn test_no_partial_name_matches() {
        assert!(!area_in_state("Pulaski; Saline, Arkansas", "Kansas"));
        assert!(!area_in_state("Pulaski, AR; Saline, AR", "Kansas"));
        assert!(!area_in_state("Kanawha, WV", "Virginia"));
        assert!(area_in_state("Kanawha, WV", "West Virginia"));
    }

    #[test]
    fn test_multi_state_area() {
        let area = "Bristol, VA; Sullivan, TN";
        assert!(area_in_state(area, "Tennessee"));
        assert!(area_in_state(area, "Virginia"));
        assert!(!area_in_state(area, "Kentucky"));
        assert!(!area_in_state(area, ""));
    }
}
