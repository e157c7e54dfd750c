use chrono::NaiveDate;

/// Interpret a statement date token (`DD/MM/YYYY`, `DD-MM-YYYY`, or a
/// two-digit year) as a calendar date.
///
/// Statements handled here are day-first. Returns `None` for sentinels and
/// impossible dates such as `31/02/2024`.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let sep = if s.contains('/') { '/' } else { '-' };
    let mut parts = s.split(sep);

    let day: u32 = parse_part(parts.next()?, 2)?;
    let month: u32 = parse_part(parts.next()?, 2)?;
    let year_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let year = match year_str.len() {
        2 => expand_year(year_str.parse().ok()?),
        3 | 4 => year_str.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_part(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}
