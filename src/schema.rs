//! Typed invoice schema and the fallible parse step.
//!
//! The HTTP contract for the invoice endpoint is best-effort passthrough:
//! the backend's reply is forwarded verbatim and downstream consumers parse
//! it themselves. That contract is preserved — but library callers get a
//! better deal: [`parse_invoice`] attempts a typed parse of the reply and
//! tags the result, so a consumer that wants a guaranteed-shape record can
//! have one without the endpoint contract changing underneath anyone.
//!
//! Field names mirror the instruction's schema exactly (camelCase on the
//! wire). Every scalar field defaults to the empty string because the
//! instruction requires the backend to emit `""` for absent values; a
//! missing key is treated the same as an empty one rather than failing the
//! whole parse.

use crate::pipeline::interpret::brace_span;
use serde::{Deserialize, Serialize};

/// One row of the invoice's item table. All values are strings as written
/// on the document (plain digits, no separators or currency symbols).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub item_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub hsn_sac: String,
    pub taxable_value: String,
    pub cgst_percent: String,
    pub cgst_amount: String,
    pub sgst_percent: String,
    pub sgst_amount: String,
}

/// The full invoice record as described by the extraction instruction.
///
/// Header and totals fields are plain strings (empty = absent). The banking
/// block only appears in one instruction variant, so those fields are
/// `Option` and omitted from serialisation when `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceRecord {
    // ── Header ────────────────────────────────────────────────────────────
    pub invoice_number: String,
    pub invoice_date: String,
    pub po_number: String,
    pub supplier_name: String,
    pub bill_to: String,
    pub bill_to_address: String,
    pub bill_to_gst: String,
    pub bill_to_mobile: String,
    pub place_of_supply: String,
    pub pan_number: String,

    // ── Items ─────────────────────────────────────────────────────────────
    pub items: Vec<LineItem>,

    // ── Totals ────────────────────────────────────────────────────────────
    pub subtotal: String,
    pub cgst: String,
    pub sgst: String,
    pub round_off: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub total_amount_in_words: String,

    // ── Banking (one instruction variant only) ────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
}

/// Outcome of the typed invoice parse.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceParse {
    /// The reply contained a JSON object matching the invoice schema.
    Parsed(Box<InvoiceRecord>),
    /// The reply could not be parsed; the raw text is all there is.
    Unparsed,
}

impl InvoiceParse {
    /// The parsed record, if any.
    pub fn record(&self) -> Option<&InvoiceRecord> {
        match self {
            InvoiceParse::Parsed(r) => Some(r),
            InvoiceParse::Unparsed => None,
        }
    }
}

/// Attempt a typed parse of a raw backend reply.
///
/// Uses the same greedy brace span as the weight interpreter to tolerate
/// conversational wrapping or markdown fencing around the JSON. Unknown
/// keys are ignored and missing keys default — the instruction forbids
/// both, but the backend is untrusted and a partially conforming reply is
/// still worth typing.
pub fn parse_invoice(reply: &str) -> InvoiceParse {
    let Some(span) = brace_span(reply) else {
        return InvoiceParse::Unparsed;
    };
    match serde_json::from_str::<InvoiceRecord>(span) {
        Ok(record) => InvoiceParse::Parsed(Box::new(record)),
        Err(e) => {
            tracing::debug!("invoice reply did not parse as typed record: {e}");
            InvoiceParse::Unparsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_REPLY: &str = r#"{
        "invoiceNumber": "INV-042",
        "invoiceDate": "01/04/2025",
        "supplierName": "Acme Traders",
        "items": [
            {"itemName": "Steel rods", "quantity": "10", "unitPrice": "150.00", "amount": "1500.00"}
        ],
        "totalAmount": "1500.00"
    }"#;

    #[test]
    fn parses_clean_reply() {
        let parse = parse_invoice(MINIMAL_REPLY);
        let record = parse.record().expect("should parse");
        assert_eq!(record.invoice_number, "INV-042");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].item_name, "Steel rods");
        // Missing keys default to empty, per the instruction's contract.
        assert_eq!(record.po_number, "");
        assert!(record.bank_name.is_none());
    }

    #[test]
    fn parses_reply_wrapped_in_prose() {
        let wrapped = format!("Sure! Here is the extracted data:\n{MINIMAL_REPLY}\nLet me know!");
        assert!(parse_invoice(&wrapped).record().is_some());
    }

    #[test]
    fn garbage_reply_is_unparsed() {
        assert_eq!(parse_invoice("I could not read the document."), InvoiceParse::Unparsed);
        assert_eq!(parse_invoice("{not json at all]"), InvoiceParse::Unparsed);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let record = InvoiceRecord {
            invoice_number: "7".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"invoiceNumber\":\"7\""));
        assert!(json.contains("\"totalAmountInWords\""));
        // Banking fields absent unless set.
        assert!(!json.contains("bankName"));
    }

    #[test]
    fn banking_variant_round_trips() {
        let reply = r#"{"invoiceNumber":"9","bankName":"State Bank","ifscCode":"SBIN0001"}"#;
        let record = parse_invoice(reply).record().cloned().expect("parses");
        assert_eq!(record.bank_name.as_deref(), Some("State Bank"));
        assert_eq!(record.ifsc_code.as_deref(), Some("SBIN0001"));
    }
}
