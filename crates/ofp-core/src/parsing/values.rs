use rust_decimal::Decimal;
use std::str::FromStr;

/// Outcome of capturing one numeric field from document text.
///
/// The missing/ambiguous distinction is load-bearing: a field whose pattern
/// never matched is `Missing`, while a matched token that fails to parse as
/// a decimal is `Ambiguous` and carries the raw token for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NumericCapture {
    #[default]
    Missing,
    Ambiguous(String),
    Value(Decimal),
}

impl NumericCapture {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            NumericCapture::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, NumericCapture::Missing)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, NumericCapture::Ambiguous(_))
    }

    /// First capture that is not missing wins; used to chain fallbacks.
    pub fn or_else(self, fallback: impl FnOnce() -> NumericCapture) -> NumericCapture {
        if self.is_missing() {
            fallback()
        } else {
            self
        }
    }
}

/// Parse a matched numeric token, stripping thousands separators.
///
/// Policy for partially-numeric tokens (e.g. "12kg extra"): any token that
/// contains a digit but fails whole-token decimal parsing is ambiguous; a
/// token with no digits at all is treated as no capture, i.e. missing.
pub fn parse_number(token: &str) -> NumericCapture {
    let stripped = token.replace(',', "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return NumericCapture::Missing;
    }
    match Decimal::from_str(stripped) {
        Ok(v) => NumericCapture::Value(v),
        Err(_) => {
            if stripped.chars().any(|c| c.is_ascii_digit()) {
                NumericCapture::Ambiguous(token.trim().to_string())
            } else {
                NumericCapture::Missing
            }
        }
    }
}

/// Normalize a 3-4 digit HHMM token to an `HH:MM:00Z` string. Only literal
/// zero-padding is performed; no timezone arithmetic.
pub fn normalize_zulu(token: &str) -> Option<String> {
    let digits = token.trim();
    if digits.len() < 3 || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{:0>4}", digits);
    Some(format!("{}:{}:00Z", &padded[..2], &padded[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_plain_integer() {
        assert_eq!(parse_number("4200"), NumericCapture::Value(dec!(4200)));
    }

    #[test]
    fn parses_decimal_point() {
        assert_eq!(parse_number("77.1"), NumericCapture::Value(dec!(77.1)));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_number("77,100"), NumericCapture::Value(dec!(77100)));
    }

    #[test]
    fn partially_numeric_token_is_ambiguous() {
        assert_eq!(
            parse_number("12kg extra"),
            NumericCapture::Ambiguous("12kg extra".into())
        );
    }

    #[test]
    fn digitless_token_is_missing() {
        assert_eq!(parse_number("n/a"), NumericCapture::Missing);
        assert_eq!(parse_number("  "), NumericCapture::Missing);
    }

    #[test]
    fn capture_chain_first_success_wins() {
        let got = NumericCapture::Missing.or_else(|| NumericCapture::Value(dec!(5)));
        assert_eq!(got, NumericCapture::Value(dec!(5)));
        let got = NumericCapture::Value(dec!(1)).or_else(|| NumericCapture::Value(dec!(5)));
        assert_eq!(got, NumericCapture::Value(dec!(1)));
    }

    #[test]
    fn zulu_pads_three_digit_times() {
        assert_eq!(normalize_zulu("945").as_deref(), Some("09:45:00Z"));
        assert_eq!(normalize_zulu("1310").as_deref(), Some("13:10:00Z"));
    }

    #[test]
    fn zulu_rejects_non_numeric_tokens() {
        assert_eq!(normalize_zulu("9x45"), None);
        assert_eq!(normalize_zulu("12345"), None);
    }
}
