//! Drill-down links from a table cell to the per-test graph page
//!
//! The link is derived from the current page URL: its last path segment is
//! replaced by `<run_id>/graph?test.<test_id>=<field>`.

use regex::Regex;

/// Field code used when the page URL has no `field` parameter (compile time)
pub const DEFAULT_FIELD: u32 = 2;

/// Replace the last path segment of a URL, dropping any query string.
///
/// A single trailing `/` is ignored, so `.../global_status/` and
/// `.../global_status` both resolve relative to `.../`.
pub fn replace_basename(url: &str, new_basename: &str) -> String {
    let mut base = match url.rfind('?') {
        Some(pos) => &url[..pos],
        None => url,
    };
    if let Some(stripped) = base.strip_suffix('/') {
        base = stripped;
    }

    let without_base = match base.rfind('/') {
        Some(pos) => &base[..=pos],
        None => "",
    };
    format!("{}{}", without_base, new_basename)
}

/// Value of a query-string parameter, or `""` when absent.
///
/// `+` decodes to a space and `%XX` escapes are decoded.
pub fn query_parameter(url: &str, name: &str) -> String {
    let search = match url.find('?') {
        Some(pos) => &url[pos..],
        None => return String::new(),
    };
    let search = match search.find('#') {
        Some(pos) => &search[..pos],
        None => search,
    };

    let pattern = format!("[?&]{}=([^&#]*)", regex::escape(name));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };

    re.captures(search)
        .and_then(|caps| caps.get(1))
        .map(|m| percent_decode(&m.as_str().replace('+', " ")))
        .unwrap_or_default()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decode `%XX` escapes; malformed escapes are kept as-is
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            ) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Graph-page URL for one cell of the table
pub fn drilldown_url(current_url: &str, run_id: &str, test_id: &str, default_field: u32) -> String {
    let field = query_parameter(current_url, "field");
    let field = if field.is_empty() {
        default_field.to_string()
    } else {
        field
    };

    let new_base = format!("{}/graph?test.{}={}", run_id, test_id, field);
    log::debug!("drill-down for {} in run {}: field {}", test_id, run_id, field);
    replace_basename(current_url, &new_base)
}
