//! Filename hint from a `Content-Disposition` header.

/// Extracts the filename hint from a raw `Content-Disposition` value.
///
/// Handles `filename="quoted"`, `filename=token` and the RFC 5987
/// `filename*=UTF-8''percent%20encoded` form; `filename*` wins when both are
/// present. Surrounding quote characters are stripped. Returns `None` when no
/// non-empty filename parameter exists.
pub fn filename_hint(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in header_value.split(';').map(str::trim) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case("filename*") {
            if let Some(decoded) = decode_ext_value(value) {
                return Some(decoded);
            }
        } else if name.eq_ignore_ascii_case("filename") {
            let unquoted = unquote(value);
            if !unquoted.is_empty() {
                plain = Some(unquoted);
            }
        }
    }

    plain
}

/// Strips surrounding `"` / `'` and undoes `\"` and `\\` escapes.
fn unquote(value: &str) -> String {
    let inner = value.trim_matches(|c| c == '"' || c == '\'');
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// `charset'lang'pct-encoded` → decoded string. Only UTF-8 (any case) is accepted.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    let decoded = unquote(&percent_decode(encoded));
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// Lenient percent-decode: malformed escapes are kept verbatim, invalid UTF-8 is replaced.
pub(super) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
