//! URL list parsing for interactive and argument input.

/// Splits `line` on whitespace and commas, dropping blank entries.
///
/// Order is preserved and repeats are kept; fetching the same URL twice is
/// how the dedup ledger gets exercised.
pub fn parse_url_list(line: &str) -> Vec<String> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`parse_url_list`] over several arguments (`a.png,b.png c.png`).
pub fn parse_url_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|a| parse_url_list(a.as_ref()))
        .collect()
}
