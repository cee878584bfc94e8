use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::pricing_service::PricingService;

/// Everything the estimate widgets need: the listing's rate and override
/// flags plus the guest's (possibly still incomplete) date selection.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteInput {
    #[serde(rename = "nightlyRate")]
    pub nightly_rate: f64,
    #[serde(rename = "checkIn")]
    pub check_in: Option<NaiveDate>,
    #[serde(rename = "checkOut")]
    pub check_out: Option<NaiveDate>,
    #[serde(rename = "excludeCleaningFee", default)]
    pub exclude_cleaning_fee: bool,
    #[serde(rename = "excludeDiscount", default)]
    pub exclude_discount: bool,
    #[serde(rename = "discountPercentage")]
    pub discount_percentage: Option<f64>,
}

/*
    /api/bookings/quote

    Shared estimate endpoint for the quick-booking modal, the detail-page
    sidebar and the payment review screen. Incomplete dates are a normal
    state and come back as the zero quote with 200.
*/
pub async fn quote(input: web::Json<QuoteInput>) -> impl Responder {
    let input = input.into_inner();
    let quote = PricingService::compute_quote(
        input.nightly_rate,
        input.check_in,
        input.check_out,
        input.exclude_cleaning_fee,
        input.exclude_discount,
        input.discount_percentage,
    );
    HttpResponse::Ok().json(quote)
}
