//! Payment method resolution for a fiat currency.
//!
//! The public lookup keys methods by the provider's numeric fiat type. When
//! the lookup is empty or lacks the currency, a static table is used.

use serde_json::Value;

/// Used when nothing else matches.
pub const FALLBACK_METHOD: &str = "UPI";

/// Provider fiat type id for an upper-case ISO currency code.
pub fn fiat_type(currency: &str) -> Option<&'static str> {
    let id = match currency {
        "INR" => "1",
        "TRY" => "2",
        "AED" => "3",
        "MXN" => "4",
        "VND" => "5",
        "NGN" => "6",
        "BRL" => "7",
        "PEN" => "8",
        "COP" => "9",
        "CLP" => "10",
        "PHP" => "11",
        "EUR" => "12",
        "IDR" => "14",
        "KES" => "15",
        "GHS" => "16",
        "ZAR" => "17",
        "GBP" => "20",
        "USD" => "21",
        "THB" => "27",
        "MYR" => "28",
        "ARS" => "29",
        _ => return None,
    };
    Some(id)
}

/// Static method per currency.
pub fn static_method(currency: &str) -> &'static str {
    match currency {
        "INR" => "UPI",
        "TRY" => "TRY_BANK_TRANSFER",
        "AED" => "AED-BANK-TRANSFER",
        "MXN" => "SPEI",
        "EUR" => "SEPA_BANK_TRANSFER",
        "IDR" => "IDR_BANK_TRANSFER",
        "GBP" => "FASTER_PAYMENTS",
        "USD" => "ACH",
        _ => FALLBACK_METHOD,
    }
}

/// Where a resolved method came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSource {
    Lookup,
    Static,
}

/// Pick the payment method for `currency` from the public lookup result.
///
/// Takes the first method listed for the currency's fiat type; otherwise
/// falls back to [`static_method`].
pub fn resolve(methods: &Value, currency: &str) -> (String, MethodSource) {
    let listed = fiat_type(currency).and_then(|id| methods.get(id));
    match listed {
        Some(Value::Object(map)) => {
            let method = map
                .keys()
                .next()
                .filter(|k| !k.is_empty())
                .map(String::as_str)
                .unwrap_or(FALLBACK_METHOD);
            (method.to_string(), MethodSource::Lookup)
        }
        Some(v) if is_truthy(v) => (FALLBACK_METHOD.to_string(), MethodSource::Lookup),
        _ => (static_method(currency).to_string(), MethodSource::Static),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
