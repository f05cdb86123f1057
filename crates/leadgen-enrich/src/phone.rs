//! Phone text → canonical digit string.

/// Brazil calling code.
const COUNTRY_PREFIX: &str = "55";
const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 13;

/// Converts phone-like text into a digit string plausibly reachable on WhatsApp.
///
/// Every non-digit is dropped and the result must hold 10 to 13 digits, which
/// covers Brazilian landlines and mobiles with or without the country code.
/// A leading `55` is then removed whatever the length, so a national number
/// whose area code happens to be 55 also loses those digits. The
/// `strip_country_prefix` switch exists to turn that off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneNormalizer {
    strip_country_prefix: bool,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            strip_country_prefix: true,
        }
    }
}

impl PhoneNormalizer {
    #[must_use]
    pub fn new(strip_country_prefix: bool) -> Self {
        Self {
            strip_country_prefix,
        }
    }

    /// Returns `None` when the text carries fewer than 10 or more than 13 digits.
    #[must_use]
    pub fn normalize(&self, text: &str) -> Option<String> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return None;
        }
        if self.strip_country_prefix {
            if let Some(national) = digits.strip_prefix(COUNTRY_PREFIX) {
                return Some(national.to_string());
            }
        }
        Some(digits)
    }
}

/// [`PhoneNormalizer::normalize`] with the default prefix stripping.
#[must_use]
pub fn normalize_phone(text: &str) -> Option<String> {
    PhoneNormalizer::default().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_country_code_and_punctuation() {
        assert_eq!(
            normalize_phone("+55 (11) 99999-8888").as_deref(),
            Some("11999998888")
        );
    }

    #[test]
    fn keeps_national_number_without_prefix() {
        assert_eq!(
            normalize_phone("(11) 3333-4444").as_deref(),
            Some("1133334444")
        );
    }

    #[test]
    fn rejects_too_few_digits() {
        assert_eq!(normalize_phone("3333-444"), None);
        assert_eq!(normalize_phone("1234567"), None);
    }

    #[test]
    fn rejects_too_many_digits() {
        assert_eq!(normalize_phone("+55 11 99999-8888 ramal 12"), None);
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("ligue agora"), None);
    }

    #[test]
    fn strips_55_even_from_a_national_number() {
        // Area code 55 (Rio Grande do Sul) is indistinguishable from the
        // calling code here, so the subscriber number is truncated.
        assert_eq!(
            normalize_phone("(55) 3222-1111").as_deref(),
            Some("32221111")
        );
    }

    #[test]
    fn prefix_stripping_can_be_disabled() {
        let normalizer = PhoneNormalizer::new(false);
        assert_eq!(
            normalizer.normalize("(55) 3222-1111").as_deref(),
            Some("5532221111")
        );
        assert_eq!(
            normalizer.normalize("+55 (11) 99999-8888").as_deref(),
            Some("5511999998888")
        );
    }

    #[test]
    fn wa_me_link_digits_are_normalized() {
        assert_eq!(
            normalize_phone("https://wa.me/5511988887777").as_deref(),
            Some("11988887777")
        );
    }
}
