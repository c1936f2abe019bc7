//! Filesystem-safe filename sanitization.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Makes an untrusted filename safe to join onto the download directory.
///
/// - `/`, `\`, NUL, control characters and whitespace become `_`
/// - runs of `_` collapse to one
/// - leading/trailing dots, spaces and underscores are trimmed
/// - the result is cut to 255 bytes, keeping the extension when possible
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    truncate_keeping_extension(trimmed, NAME_MAX)
}

fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(i) if name.len() - i <= 16 => name.split_at(i),
        _ => (name, ""),
    };
    let mut take = max - ext.len();
    while take > 0 && !stem.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{}", &stem[..take], ext)
}
