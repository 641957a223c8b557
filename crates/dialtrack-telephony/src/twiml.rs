//! TwiML voice menu builder
//!
//! Produces the TwiML document Twilio fetches when the callee answers: a
//! one-digit Gather with the greeting, then a department sign-off if no
//! digit is pressed. The gathered digit is posted to the status webhook and
//! lands in the record as the IVR selection.

use dialtrack_core::models::Department;
use std::fmt::Write;

/// Build the voice menu TwiML for a call
pub fn build_voice_menu(customer_name: &str, department: Department) -> String {
    let name = if customer_name.trim().is_empty() {
        "Customer"
    } else {
        customer_name.trim()
    };

    let mut doc = String::with_capacity(512);
    doc.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    doc.push_str("<Response>");
    doc.push_str(r#"<Gather numDigits="1" action="/webhooks/call-status" method="POST">"#);
    let _ = write!(
        doc,
        "<Say>Hello {}, this is an automated call regarding your requirements.</Say>",
        escape_xml(name)
    );
    doc.push_str(
        "<Say>If you are interested, press 1. To schedule a call later, press 2. \
         If not interested, press 3.</Say>",
    );
    doc.push_str("</Gather>");
    let _ = write!(
        doc,
        "<Say>Thank you from the {} team. We will reach out to you shortly. Goodbye.</Say>",
        escape_xml(department.as_str())
    );
    doc.push_str("</Response>");

    doc
}

/// Escape text for embedding in an XML element
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_contains_greeting_and_signoff() {
        let doc = build_voice_menu("Priya", Department::Sales);
        assert!(doc.contains("Hello Priya"));
        assert!(doc.contains("the Sales team"));
        assert!(doc.contains(r#"<Gather numDigits="1""#));
        assert!(doc.ends_with("</Response>"));
    }

    #[test]
    fn test_blank_name_falls_back() {
        let doc = build_voice_menu("   ", Department::Support);
        assert!(doc.contains("Hello Customer"));
    }

    #[test]
    fn test_name_is_xml_escaped() {
        let doc = build_voice_menu("A & B <Co>", Department::Crm);
        assert!(doc.contains("A &amp; B &lt;Co&gt;"));
        assert!(!doc.contains("<Co>"));
    }
}
