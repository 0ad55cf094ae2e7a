/// Names shorter than this are rejected.
const MIN_LEN: usize = 2;
/// Names this long or longer are rejected.
const MAX_LEN: usize = 15;

/// Free text → wiki display-name casing, or `None` if it cannot be a champion name.
///
/// `"jarvan iv"` → `"Jarvan Iv"`, `"REK'SAI"` → `"Rek'Sai"`.
pub fn normalize(raw: &str) -> Option<String> {
    if !raw.chars().any(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let mut out = String::with_capacity(raw.len());
    let mut upper_next = true;
    for c in raw.trim().chars().filter(|c| !c.is_control()) {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = c == '\'' || c == ' ';
    }

    let len = out.chars().count();
    (MIN_LEN..MAX_LEN).contains(&len).then_some(out)
}
