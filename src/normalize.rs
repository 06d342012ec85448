use std::sync::OnceLock;

use regex::Regex;

use crate::model::Balance;

fn yen_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9,]*([0-9,]+)円").expect("invalid yen regex"))
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9,]*([0-9,]+円)\n").expect("invalid heading regex"))
}

/// Reads a yen display string such as `"資産：12,345円\n"` as an amount.
///
/// Only the first `<digits>円` run is used; thousands separators are dropped
/// and any sign in front of it is treated as noise. Strings without that
/// pattern come back unchanged as [`Balance::Raw`].
pub fn normalize(raw: &str) -> Balance {
    let Some(caps) = yen_re().captures(raw) else {
        return Balance::Raw(raw.to_string());
    };
    let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
    match digits.parse::<i64>() {
        Ok(amount) => Balance::Amount(amount),
        Err(_) => Balance::Raw(raw.to_string()),
    }
}

/// Cuts the total-assets heading down to its `"<digits>円"` part.
pub fn clean_heading(raw: &str) -> String {
    heading_re()
        .replacen(raw, 1, "$1")
        .replace("\r\n", "")
        .replace('\n', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_amount_with_separators() {
        assert_eq!(normalize("資産：12,345円\n"), Balance::Amount(12345));
        assert_eq!(normalize("1,234円"), Balance::Amount(1234));
        assert_eq!(normalize("\n  987円  \n"), Balance::Amount(987));
        assert_eq!(normalize("0円"), Balance::Amount(0));
    }

    #[test]
    fn uses_first_amount_only() {
        assert_eq!(normalize("評価額 3,000円 (前日比 +12円)"), Balance::Amount(3000));
    }

    #[test]
    fn sign_is_noise() {
        assert_eq!(normalize("-5,000円"), Balance::Amount(5000));
    }

    #[test]
    fn passes_through_without_suffix() {
        for s in ["", "-", "1,234", "12.5 BTC", "円", ",円", "n/a"] {
            assert_eq!(normalize(s), Balance::Raw(s.to_string()), "input {s:?}");
        }
    }

    #[test]
    fn heading_keeps_amount_and_suffix() {
        assert_eq!(clean_heading("資産総額：\n12,345,678円\n"), "12,345,678円");
        assert_eq!(clean_heading("no amount\r\nhere"), "no amounthere");
    }
}
