//! Label escaping for writing Newick strings.

/// Characters that cannot appear in an unquoted Newick label
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters (punctuation, delimiters) are
/// wrapped in single quotes, with internal single quotes doubled. Otherwise
/// spaces are replaced with underscores.
///
/// # Examples
/// ```
/// # use splitwick::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.contains(SPECIAL_CHARS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}
