//! A1-notation helpers.

/// 1 → "A", 26 → "Z", 27 → "AA".
pub fn column_letters(mut col: usize) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Quote a worksheet title for use in a range (`'My Tab'`).
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

pub fn cell(title: &str, row: usize, col: usize) -> String {
    format!("{}!{}{}", quote_title(title), column_letters(col), row)
}

pub fn whole_column(title: &str, col: usize) -> String {
    let c = column_letters(col);
    format!("{}!{}:{}", quote_title(title), c, c)
}

pub fn whole_row(title: &str, row: usize) -> String {
    format!("{}!{}:{}", quote_title(title), row, row)
}
