//! Input masks, applied on every keystroke.

/// `16 digits + 3 separators`
pub const CARD_NUMBER_MAX_LEN: usize = 19;
pub const CVV_MAX_DIGITS: usize = 4;
const EXPIRY_MAX_DIGITS: usize = 4;

fn digits(raw: &str) -> impl Iterator<Item = char> + '_ {
    raw.chars().filter(|c| c.is_ascii_digit())
}

/// `"4111111111111111"` → `"4111 1111 1111 1111"`
pub fn card_number(raw: &str) -> String {
    let mut out = String::with_capacity(CARD_NUMBER_MAX_LEN);
    for (i, d) in digits(raw).enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(d);
    }
    out.truncate(CARD_NUMBER_MAX_LEN);
    out
}

/// `"1234"` → `"12/34"`. The slash appears only once a third digit is typed.
pub fn expiry_date(raw: &str) -> String {
    let d: String = digits(raw).take(EXPIRY_MAX_DIGITS).collect();
    if d.len() > 2 {
        format!("{}/{}", &d[..2], &d[2..])
    } else {
        d
    }
}

pub fn cvv(raw: &str) -> String {
    digits(raw).take(CVV_MAX_DIGITS).collect()
}
