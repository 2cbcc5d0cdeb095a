use crate::error::{ProcessingError, Result};
use crate::utils::constants::BYTE_ORDER_LOCALES;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use std::cmp::Ordering;

/// Ordering applied to station names in the report.
pub trait Collation {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;

    fn name(&self) -> &str;
}

/// Raw byte order, as the `C` locale sorts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCollation;

impl Collation for ByteCollation {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        left.cmp(right)
    }

    fn name(&self) -> &str {
        "C"
    }
}

/// Unicode collation tailored for one locale.
pub struct LocaleCollation {
    collator: Collator,
    locale: String,
}

impl LocaleCollation {
    pub fn new(locale: &str) -> Result<Self> {
        let tag = normalize_locale(locale);
        let parsed: Locale = tag
            .parse()
            .map_err(|e| ProcessingError::Collation(format!("invalid locale '{}': {:?}", locale, e)))?;

        let collator = Collator::try_new(&parsed.into(), CollatorOptions::new()).map_err(|e| {
            ProcessingError::Collation(format!("no collation data for '{}': {:?}", locale, e))
        })?;

        Ok(Self {
            collator,
            locale: tag,
        })
    }
}

impl Collation for LocaleCollation {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        self.collator.compare_utf8(left, right)
    }

    fn name(&self) -> &str {
        &self.locale
    }
}

/// Build the collation for a configured locale name.
///
/// `C` and `POSIX` select byte order; anything else must be a BCP-47 tag.
/// POSIX-style names such as `de_DE.UTF-8` are accepted as well.
pub fn collation_for(locale: &str) -> Result<Box<dyn Collation>> {
    if BYTE_ORDER_LOCALES.contains(&locale) {
        return Ok(Box::new(ByteCollation));
    }
    Ok(Box::new(LocaleCollation::new(locale)?))
}

fn normalize_locale(locale: &str) -> String {
    let without_codeset = locale
        .split(|c| c == '.' || c == '@')
        .next()
        .unwrap_or(locale);
    without_codeset.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(collation: &dyn Collation, names: &[&str]) -> Vec<String> {
        let mut names: Vec<&str> = names.to_vec();
        names.sort_by(|a, b| collation.compare(a.as_bytes(), b.as_bytes()));
        names.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_byte_order() {
        let names = sorted(&ByteCollation, &["Zagreb", "Ålesund", "Berlin", "berlin"]);
        assert_eq!(names, vec!["Berlin", "Zagreb", "berlin", "Ålesund"]);
    }

    #[test]
    fn test_english_collation_ignores_accents_and_case_first() {
        let collation = LocaleCollation::new("en").unwrap();
        let names = sorted(&collation, &["Zagreb", "Ålesund", "Bonn", "berlin"]);
        assert_eq!(names, vec!["Ålesund", "berlin", "Bonn", "Zagreb"]);
    }

    #[test]
    fn test_swedish_sorts_aring_after_z() {
        let collation = LocaleCollation::new("sv").unwrap();
        let names = sorted(&collation, &["Ålesund", "Zagreb", "Berlin"]);
        assert_eq!(names, vec!["Berlin", "Zagreb", "Ålesund"]);
    }

    #[test]
    fn test_collation_for() {
        assert_eq!(collation_for("C").unwrap().name(), "C");
        assert_eq!(collation_for("POSIX").unwrap().name(), "C");
        assert_eq!(collation_for("de_DE.UTF-8").unwrap().name(), "de-DE");
        assert!(matches!(
            collation_for("not a locale!"),
            Err(ProcessingError::Collation(_))
        ));
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8"), "en-US");
        assert_eq!(normalize_locale("de_DE@euro"), "de-DE");
        assert_eq!(normalize_locale("fr"), "fr");
    }
}
