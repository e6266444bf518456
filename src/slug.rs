//! URL slugs for region names.

/// Transliterate to ASCII, lowercase, keep alphanumerics and collapse
/// whitespace, `-` and `_` runs into a single hyphen. Other punctuation is
/// dropped (`Côte d'Ivoire` → `cote-divoire`).
pub fn slugify(s: &str) -> String {
    let folded = deunicode::deunicode(s).to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_sep = false;

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_sep = true;
        }
    }

    out
}
