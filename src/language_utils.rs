use isolang::Language;

use crate::errors::ConfigError;

/// Language utilities for ISO language code handling
///
/// Target languages are used verbatim as translation keys; these helpers only
/// check that a code names a real language and look up display names.
/// Region subtags (`pt-BR`, `zh_TW`) are accepted and ignored for lookup.
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(code: &str) -> Option<Language> {
    let primary = primary_subtag(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Validate that a code is an ISO 639-1 or ISO 639-3 language code
pub fn validate_language_code(code: &str) -> Result<(), ConfigError> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| ConfigError::InvalidLanguage(code.to_string()))
}

/// English name of the language, if the code is known
pub fn get_language_name(code: &str) -> Option<String> {
    lookup(code).map(|lang| lang.to_name().to_string())
}

/// Display label such as `English (en)`, falling back to the raw code
pub fn display_label(code: &str) -> String {
    match get_language_name(code) {
        Some(name) => format!("{} ({})", name, code),
        None => code.to_string(),
    }
}
