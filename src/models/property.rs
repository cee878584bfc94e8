use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A rental listing as stored in the `Properties` collection and served to
/// the public site. Image references are kept verbatim: entries can be full
/// URLs, blob-store ids, `/api/images/...` paths or legacy relative paths,
/// and the first entry is the cover image.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Property {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "nightlyRate")]
    pub nightly_rate: f64,
    #[serde(rename = "excludeCleaningFee", default)]
    pub exclude_cleaning_fee: bool,
    #[serde(rename = "excludeDiscount", default)]
    pub exclude_discount: bool,
    #[serde(rename = "discountPercentage", skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(rename = "maxGuests", skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Wire shape of the public catalog endpoint. The frontend keys off
/// `success` and falls back to its bundled snapshot when it is false,
/// so the fallback served here uses the exact same envelope.
#[derive(Debug, Deserialize, Serialize)]
pub struct PropertiesResponse {
    pub success: bool,
    pub properties: Vec<Property>,
}
