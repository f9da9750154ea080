//! Display symbols for currency codes

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("AUD", "A$"),
    ("CAD", "C$"),
    ("CHF", "CHF"),
    ("CNY", "¥"),
    ("HKD", "HK$"),
    ("NZD", "NZ$"),
    ("SEK", "kr"),
    ("NOK", "kr"),
    ("DKK", "kr"),
    ("KRW", "₩"),
    ("INR", "₹"),
    ("SGD", "S$"),
    ("MXN", "MX$"),
    ("BRL", "R$"),
    ("ZAR", "R"),
    ("RUB", "₽"),
    ("TRY", "₺"),
    ("PLN", "zł"),
    ("THB", "฿"),
    ("ILS", "₪"),
    ("PHP", "₱"),
    ("VND", "₫"),
    ("NGN", "₦"),
    ("UAH", "₴"),
];

/// Returns the display symbol for `code`, or `code` itself when no symbol is known.
pub fn lookup(code: &str) -> &str {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, symbol)| *symbol)
}
