/// Price formatting for amounts shown next to products.

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// `<symbol><amount with two decimals>`, e.g. `$19.50`. Ties round away from
/// zero and negative zero prints as `0.00`.
pub fn format_price(amount: f64, currency: &str) -> String {
    let amount = if amount == 0.0 { 0.0 } else { amount };
    let rounded = (amount * 100.0).round() / 100.0;
    let rounded = if rounded.is_finite() { rounded } else { amount };
    format!("{}{:.2}", currency, rounded)
}

/// Like [`format_price`] for amounts that arrive as text, which is how WHMCS
/// returns pricing. Leading numeric text is accepted ("4.99/mo" reads as 4.99).
pub fn format_price_str(amount: &str, currency: &str) -> Option<String> {
    parse_leading_amount(amount).map(|a| format_price(a, currency))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest numeric prefix: sign, digits, fraction, then an exponent only when
/// digits follow the `e`.
fn parse_leading_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}
