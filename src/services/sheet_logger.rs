use std::env;
use url::Url;

use crate::models::booking::Booking;

/// Flatten a confirmed booking into the form fields the Apps Script
/// spreadsheet endpoint expects. Kept separate so the payload shape is
/// testable without a network.
pub fn booking_form(booking: &Booking) -> Vec<(&'static str, String)> {
    vec![
        ("reference", booking.reference.clone()),
        ("property", booking.property_name.clone()),
        ("guestName", booking.guest_name.clone()),
        ("guestEmail", booking.guest_email.clone()),
        (
            "guestPhone",
            booking.guest_phone.clone().unwrap_or_default(),
        ),
        ("checkIn", booking.check_in.to_string()),
        ("checkOut", booking.check_out.to_string()),
        ("guests", booking.guests.to_string()),
        ("nights", booking.quote.nights.to_string()),
        ("total", format!("{:.2}", booking.quote.total)),
        ("currency", booking.currency.clone()),
        ("paymentIntentId", booking.payment_intent_id.clone()),
    ]
}

/// Best-effort booking log to the spreadsheet webhook. Fire-and-forget:
/// every failure path is logged to stderr and swallowed. The payment's
/// success is authoritative; this must never block or reverse it.
pub async fn log_booking(booking: &Booking) {
    let webhook = match env::var("SHEETS_WEBHOOK_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "SHEETS_WEBHOOK_URL not set, skipping sheet log for booking {}",
                booking.reference
            );
            return;
        }
    };

    let webhook = match Url::parse(&webhook) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("SHEETS_WEBHOOK_URL is not a valid URL: {}", e);
            return;
        }
    };

    let client = reqwest::Client::new();
    match client.post(webhook).form(&booking_form(booking)).send().await {
        Ok(response) if response.status().is_success() => {
            println!("Logged booking {} to spreadsheet", booking.reference);
        }
        Ok(response) => {
            eprintln!(
                "Spreadsheet webhook returned {} for booking {}",
                response.status(),
                booking.reference
            );
        }
        Err(e) => {
            eprintln!(
                "Spreadsheet webhook failed for booking {}: {}",
                booking.reference, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingQuote;
    use chrono::NaiveDate;
    use mongodb::bson::oid::ObjectId;

    fn sample_booking() -> Booking {
        Booking {
            id: None,
            reference: "YGI-1A2B3C4D".to_string(),
            property_id: ObjectId::new(),
            property_name: "Marina Residency 2BR".to_string(),
            guest_name: "Amira Khan".to_string(),
            guest_email: "amira@example.com".to_string(),
            guest_phone: None,
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
            guests: 2,
            quote: BookingQuote {
                nights: 2,
                base_price: 2000.0,
                cleaning_fee: 400.0,
                service_charge: 160.0,
                subtotal: 2560.0,
                discount: 768.0,
                total: 1792.0,
            },
            amount_minor: 179200,
            currency: "aed".to_string(),
            payment_intent_id: "pi_test_123".to_string(),
            status: "confirmed".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_booking_form_fields() {
        let form = booking_form(&sample_booking());
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("reference"), "YGI-1A2B3C4D");
        assert_eq!(get("checkIn"), "2026-09-01");
        assert_eq!(get("checkOut"), "2026-09-03");
        assert_eq!(get("nights"), "2");
        assert_eq!(get("total"), "1792.00");
        assert_eq!(get("guestPhone"), "");
    }
}
