//! HTML rendering for the invoice and lookup pages.
//!
//! Every interpolated value goes through [`escape`].

use serde_json::Value;
use std::fmt::Write;

use crate::flow::InvoiceSummary;

/// Chains offered on the invoice form: (value, label).
pub const CHAIN_OPTIONS: &[(&str, &str)] = &[
    ("matic20", "Polygon (MATIC)"),
    ("bep20", "Binance Smart Chain (BSC)"),
    ("trc20", "Tron (TRX)"),
    ("erc20", "Ethereum (ERC20)"),
    ("solana", "Solana"),
    ("arbitrum", "Arbitrum"),
    ("optimism", "Optimism"),
];

/// Escape text for HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n<main class=\"container\">\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn error_box(message: &str) -> String {
    format!("<div class=\"error\" role=\"alert\"><p>{}</p></div>\n", escape(message))
}

/// The invoice form, optionally with an error from the previous attempt.
pub fn invoice_form(error: Option<&str>, default_chain: &str) -> String {
    let mut body = String::from("<h1>Create New Invoice</h1>\n");
    if let Some(message) = error {
        body.push_str(&error_box(message));
    }

    body.push_str(
        "<form method=\"post\" action=\"/invoice/new\">\n\
         <label>Phone Number (Required)\n<input type=\"text\" name=\"phone_number\" required placeholder=\"+1234567890\"></label>\n\
         <label>Email (Optional)\n<input type=\"email\" name=\"email\" placeholder=\"user@example.com\"></label>\n\
         <label>Amount\n<input type=\"number\" name=\"amount\" value=\"100\"></label>\n\
         <label>Fiat Currency\n<input type=\"text\" name=\"fiat_currency\" value=\"INR\"></label>\n\
         <label>Crypto Currency\n<input type=\"text\" name=\"crypto_currency\" value=\"usdt\"></label>\n\
         <label>Blockchain Network (Chain)\n<select name=\"chain\">\n",
    );
    for (value, label) in CHAIN_OPTIONS {
        let selected = if *value == default_chain { " selected" } else { "" };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            selected,
            escape(label)
        );
    }
    body.push_str(
        "</select></label>\n\
         <label>Description\n<input type=\"text\" name=\"description\" placeholder=\"Order #123\"></label>\n\
         <button type=\"submit\">Proceed to KYC</button>\n</form>\n",
    );

    layout("Create New Invoice", &body)
}

pub fn session_expired() -> String {
    layout(
        "Session Expired",
        "<h1>Session Expired</h1>\n<p>Please start again from the invoice form.</p>\n\
         <p><a href=\"/invoice/new\">Go back to Start</a></p>\n",
    )
}

/// Customer info, order summary and payment instructions.
pub fn invoice_summary(summary: &InvoiceSummary) -> String {
    let mut body = String::from("<h1>Invoice Details</h1>\n");

    if let Some(error) = &summary.error {
        let _ = write!(
            body,
            "<div class=\"error\" role=\"alert\"><h3>Transaction Failed</h3><p>{}</p>\
             <p><a href=\"/invoice/new\">Try again with different settings</a></p></div>\n",
            escape(error)
        );
    }

    let email = if summary.email.is_empty() { "N/A" } else { summary.email.as_str() };
    let kyc_class = if summary.kyc_approved() { "ok" } else { "pending" };
    let _ = write!(
        body,
        "<section class=\"customer\">\n<h2>Customer Info</h2>\n\
         <p>Customer ID: <code>{}</code></p>\n<p>Phone: {}</p>\n<p>Email: {}</p>\n\
         <p>KYC Status: <span class=\"{}\">{}</span></p>\n</section>\n",
        escape(&summary.customer_id),
        escape(&summary.phone),
        escape(email),
        kyc_class,
        escape(summary.kyc_status.as_deref().unwrap_or("Unknown")),
    );

    let _ = write!(
        body,
        "<section class=\"order\">\n<h2>Order Summary</h2>\n\
         <p>Paying: <strong>{} {}</strong></p>\n<p>Receiving: <strong>{} {}</strong></p>\n\
         <p>Rate: {}</p>\n<p>Chain: <span class=\"chain\">{}</span></p>\n",
        escape(&summary.amount),
        escape(&summary.fiat_currency),
        escape(summary.to_amount.as_deref().unwrap_or("...")),
        escape(&summary.crypto_currency.to_uppercase()),
        escape(summary.rate.as_deref().unwrap_or("...")),
        escape(&summary.chain.to_uppercase()),
    );
    if let Some(method) = &summary.payment_method {
        let _ = writeln!(body, "<p>Payment Method: {}</p>", escape(method));
    }
    body.push_str("</section>\n");

    if summary.transaction.is_some() {
        let _ = write!(
            body,
            "<section class=\"instructions\">\n<h2>Payment Instructions</h2>\n\
             <p>Transaction ID: <strong>{}</strong></p>\n\
             <p>Your transaction has been initialized. Please complete the payment of \
             <strong>{} {}</strong> as instructed by the Onramp widget. The crypto will be \
             sent to our secured wallet on the {} network once confirmed.</p>\n</section>\n",
            escape(summary.transaction_id.as_deref().unwrap_or("")),
            escape(&summary.amount),
            escape(&summary.fiat_currency),
            escape(&summary.chain.to_uppercase()),
        );
    }

    layout("Invoice Details", &body)
}

/// Offramp lookup form with an optional error or result.
pub fn offramp_lookup(error: Option<&str>, result: Option<&Value>) -> String {
    let mut body = String::from(
        "<h1>Offramp Transaction Lookup</h1>\n\
         <form method=\"post\" action=\"/onramp/offramp-lookup\">\n\
         <label>Customer ID\n<input type=\"text\" name=\"customer_id\" required></label>\n\
         <label>Transaction ID\n<input type=\"text\" name=\"transaction_id\" required></label>\n\
         <button type=\"submit\">Lookup Transaction</button>\n</form>\n",
    );

    if let Some(message) = error {
        body.push_str(&error_box(message));
    }
    if let Some(result) = result {
        let pretty = serde_json::to_string_pretty(result).unwrap_or_default();
        let _ = write!(
            body,
            "<section class=\"result\">\n<h2>Transaction Details</h2>\n<pre>{}</pre>\n</section>\n",
            escape(&pretty)
        );
    }

    layout("Offramp Transaction Lookup", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_invoice_form_selects_default_chain() {
        let html = invoice_form(None, "bep20");
        assert!(html.contains("<option value=\"bep20\" selected>"));
        assert!(!html.contains("<option value=\"trc20\" selected>"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn test_invoice_form_escapes_error() {
        let html = invoice_form(Some("<b>bad</b>"), "trc20");
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn test_summary_with_transaction() {
        let summary = InvoiceSummary {
            customer_id: "cust-1".into(),
            amount: "100".into(),
            fiat_currency: "INR".into(),
            crypto_currency: "usdt".into(),
            chain: "trc20".into(),
            kyc_status: Some("SUCCESS".into()),
            to_amount: Some("1.13".into()),
            rate: Some("88.1".into()),
            transaction_id: Some("tx-9".into()),
            transaction: Some(json!({"transactionId": "tx-9"})),
            ..InvoiceSummary::default()
        };
        let html = invoice_summary(&summary);
        assert!(html.contains("<strong>1.13 USDT</strong>"));
        assert!(html.contains("Transaction ID: <strong>tx-9</strong>"));
        assert!(html.contains("Email: N/A"));
        assert!(!html.contains("Transaction Failed"));
    }

    #[test]
    fn test_summary_with_error_keeps_placeholders() {
        let summary = InvoiceSummary {
            error: Some("Quote failed".into()),
            ..InvoiceSummary::default()
        };
        let html = invoice_summary(&summary);
        assert!(html.contains("Transaction Failed"));
        assert!(html.contains("Rate: ..."));
        assert!(!html.contains("Payment Instructions"));
    }

    #[test]
    fn test_offramp_result_is_escaped_json() {
        let html = offramp_lookup(None, Some(&json!({"note": "<x>"})));
        assert!(html.contains("&quot;note&quot;: &quot;&lt;x&gt;&quot;"));
    }
}
