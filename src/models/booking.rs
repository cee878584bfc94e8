use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Price breakdown for a candidate stay. Ephemeral: recomputed on every
/// date change and never stored on its own, only embedded in a confirmed
/// `Booking` as the breakdown that was actually charged.
///
/// Money fields stay unrounded; rounding happens once, at the point of
/// charge creation (see `PricingService::amount_minor`).
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BookingQuote {
    pub nights: i64,
    #[serde(rename = "basePrice")]
    pub base_price: f64,
    #[serde(rename = "cleaningFee")]
    pub cleaning_fee: f64,
    #[serde(rename = "serviceCharge")]
    pub service_charge: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub reference: String,
    pub property_id: ObjectId,
    pub property_name: String,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub quote: BookingQuote,
    /// Amount actually sent to the payment gateway, in minor units (fils).
    pub amount_minor: i64,
    pub currency: String,
    pub payment_intent_id: String,
    pub status: String,
    pub created_at: Option<DateTime>,
}
