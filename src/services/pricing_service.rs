use chrono::NaiveDate;

use crate::models::booking::BookingQuote;
use crate::models::property::Property;

/// Flat cleaning fee in AED, applied unless the listing opts out.
pub const CLEANING_FEE: f64 = 400.0;
/// Service charge rate, applied to the base price only. The cleaning fee
/// is never taxed; existing receipts depend on this.
pub const SERVICE_CHARGE_RATE: f64 = 0.08;
/// Discount applied when the listing does not carry its own percentage.
pub const DEFAULT_DISCOUNT_PERCENTAGE: f64 = 30.0;

pub struct PricingService;

impl PricingService {
    /// Compute the price breakdown for a stay. This is the single source of
    /// truth for pricing: the quote endpoint, the payment-intent amount and
    /// the stored booking breakdown all go through here.
    ///
    /// Missing dates or `check_out <= check_in` yield the zero quote, which
    /// the UI treats as "no estimate yet" rather than an error. Range
    /// validation (past dates, negative rates) belongs to the HTTP boundary,
    /// not here.
    pub fn compute_quote(
        nightly_rate: f64,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        exclude_cleaning_fee: bool,
        exclude_discount: bool,
        discount_percentage: Option<f64>,
    ) -> BookingQuote {
        let (check_in, check_out) = match (check_in, check_out) {
            (Some(ci), Some(co)) => (ci, co),
            _ => return BookingQuote::default(),
        };
        if check_out <= check_in {
            return BookingQuote::default();
        }

        // Calendar nights, day granularity
        let nights = (check_out - check_in).num_days();

        let base_price = nightly_rate * nights as f64;
        let cleaning_fee = if exclude_cleaning_fee { 0.0 } else { CLEANING_FEE };
        let service_charge = SERVICE_CHARGE_RATE * base_price;
        let subtotal = base_price + cleaning_fee + service_charge;
        let discount = if exclude_discount {
            0.0
        } else {
            let pct = discount_percentage.unwrap_or(DEFAULT_DISCOUNT_PERCENTAGE);
            subtotal * (pct / 100.0)
        };
        let total = subtotal - discount;

        BookingQuote {
            nights,
            base_price,
            cleaning_fee,
            service_charge,
            subtotal,
            discount,
            total,
        }
    }

    /// Quote a stay using the listing's own rate and override flags.
    pub fn quote_for_property(
        property: &Property,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> BookingQuote {
        Self::compute_quote(
            property.nightly_rate,
            check_in,
            check_out,
            property.exclude_cleaning_fee,
            property.exclude_discount,
            property.discount_percentage,
        )
    }

    /// The authoritative charge amount in minor units (fils). This is the
    /// only place a quote is rounded; intermediate fields are kept exact so
    /// the breakdown always sums.
    pub fn amount_minor(quote: &BookingQuote) -> i64 {
        (quote.total * 100.0).round() as i64
    }
}
