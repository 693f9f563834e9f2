//! Diff rendering for byte comparison.

/// Bytes per rendered row.
pub const ROW_WIDTH: usize = 16;

/// Uppercase hex, the notation fixtures are authored in.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Render a row-wise hex diff between expected and actual bytes.
///
/// Rows are [`ROW_WIDTH`] bytes wide and labelled by byte offset; only rows
/// that differ are printed. A length difference is reported up front.
#[must_use]
pub fn render_hex_diff(expected: &[u8], actual: &[u8]) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    if expected.len() != actual.len() {
        out.push_str(&format!(
            "@@ length {} != {} @@\n",
            expected.len(),
            actual.len()
        ));
    }

    let rows = expected.len().max(actual.len()).div_ceil(ROW_WIDTH);
    for row in 0..rows {
        let e = row_slice(expected, row);
        let a = row_slice(actual, row);
        if e != a {
            out.push_str(&format!("@@ offset {:#06x} @@\n", row * ROW_WIDTH));
            out.push_str(&format!("-{}\n", to_hex(e)));
            out.push_str(&format!("+{}\n", to_hex(a)));
        }
    }
    out
}

fn row_slice(bytes: &[u8], row: usize) -> &[u8] {
    let start = (row * ROW_WIDTH).min(bytes.len());
    let end = (start + ROW_WIDTH).min(bytes.len());
    &bytes[start..end]
}
