//! Borough-Block-Lot parcel identifiers, the location key most feeds share.

use crate::model::Borough;

/// Compose a 10-digit BBL from its parts. Block and lot must be numeric and
/// fit in five and four digits respectively.
pub fn compose(borough: Borough, block: &str, lot: &str) -> Option<String> {
    let block = numeric_part(block, 99_999)?;
    let lot = numeric_part(lot, 9_999)?;
    if block == 0 || lot == 0 {
        return None;
    }
    Some(format!("{}{:05}{:04}", borough.code(), block, lot))
}

/// Normalize a BBL published as text or as a decimal (`"3012340056.00000000"`).
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let integral = match raw.split_once('.') {
        Some((head, tail)) if tail.bytes().all(|b| b == b'0') => head,
        Some(_) => return None,
        None => raw,
    };
    let valid = integral.len() == 10
        && integral.bytes().all(|b| b.is_ascii_digit())
        && Borough::from_code(integral.as_bytes()[0] - b'0').is_some();
    valid.then(|| integral.to_string())
}

fn numeric_part(raw: &str, max: u32) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|v| *v <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_padded() {
        assert_eq!(compose(Borough::Brooklyn, "1234", "56").as_deref(), Some("3012340056"));
        assert_eq!(compose(Borough::Queens, "00123", "0001").as_deref(), Some("4001230001"));
        assert!(compose(Borough::Queens, "123456", "1").is_none());
        assert!(compose(Borough::Queens, "12a", "1").is_none());
        assert!(compose(Borough::Queens, "0", "1").is_none());
    }

    #[test]
    fn normalizes_decimal_form() {
        assert_eq!(normalize("3012340056.00000000").as_deref(), Some("3012340056"));
        assert_eq!(normalize("1000010001").as_deref(), Some("1000010001"));
        assert!(normalize("3012340056.5").is_none());
        assert!(normalize("9012340056").is_none());
        assert!(normalize("301234").is_none());
    }
}
