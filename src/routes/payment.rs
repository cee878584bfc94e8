use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo::{BOOKING_COLLECTION, DB_NAME, PROPERTY_COLLECTION};
use crate::models::booking::Booking;
use crate::models::property::Property;
use crate::services::pricing_service::PricingService;
use crate::services::sheet_logger;

#[derive(Serialize, Deserialize)]
pub struct PaymentIntentInput {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    #[serde(rename = "checkIn")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkOut")]
    pub check_out: NaiveDate,
    pub guests: u32,
}

#[derive(Serialize, Deserialize)]
pub struct ConfirmBookingInput {
    #[serde(rename = "paymentIntentId")]
    pub payment_intent_id: String,
    #[serde(rename = "propertyId")]
    pub property_id: String,
    #[serde(rename = "checkIn")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkOut")]
    pub check_out: NaiveDate,
    pub guests: u32,
    #[serde(rename = "guestName")]
    pub guest_name: String,
    #[serde(rename = "guestEmail")]
    pub guest_email: String,
    #[serde(rename = "guestPhone")]
    pub guest_phone: Option<String>,
}

/// Date validation the pricing engine deliberately does not do. Checked
/// before anything else so a bad selection never reaches the database or
/// the gateway.
fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), &'static str> {
    if check_out <= check_in {
        return Err("Check-out must be after check-in");
    }
    if check_in < Utc::now().date_naive() {
        return Err("Check-in cannot be in the past");
    }
    Ok(())
}

async fn find_property(
    client: &mongodb::Client,
    property_id: &str,
) -> Result<Property, HttpResponse> {
    let object_id = ObjectId::parse_str(property_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid property id"))?;

    let collection: mongodb::Collection<Property> =
        client.database(DB_NAME).collection(PROPERTY_COLLECTION);

    match collection.find_one(doc! { "_id": object_id }).await {
        Ok(Some(property)) => Ok(property),
        Ok(None) => Err(HttpResponse::NotFound().body("Property not found")),
        Err(err) => {
            eprintln!("Failed to find property {}: {:?}", property_id, err);
            Err(HttpResponse::InternalServerError().body("Failed to find property"))
        }
    }
}

/*
    /api/payments/payment-intent

    The amount charged is always recomputed here from the stored listing,
    never taken from a client-side estimate; selections change between
    browsing and checkout.
*/
pub async fn create_payment_intent(
    stripe_data: web::Data<Arc<stripe::Client>>,
    mongo_data: web::Data<Arc<mongodb::Client>>,
    input: web::Json<PaymentIntentInput>,
) -> impl Responder {
    println!("Creating payment intent...");
    let input = input.into_inner();

    if let Err(msg) = validate_stay(input.check_in, input.check_out) {
        return HttpResponse::BadRequest().body(msg);
    }

    let client = mongo_data.into_inner();
    let property = match find_property(&client, &input.property_id).await {
        Ok(property) => property,
        Err(response) => return response,
    };

    let quote = PricingService::quote_for_property(
        &property,
        Some(input.check_in),
        Some(input.check_out),
    );
    let amount = PricingService::amount_minor(&quote);
    if amount <= 0 {
        return HttpResponse::BadRequest().body("Stay does not produce a chargeable amount");
    }

    let mut create_intent = stripe::CreatePaymentIntent::new(amount, stripe::Currency::AED);
    create_intent.automatic_payment_methods =
        Some(stripe::CreatePaymentIntentAutomaticPaymentMethods {
            enabled: true,
            allow_redirects: None,
        });

    let mut metadata = HashMap::new();
    metadata.insert("property_id".to_string(), input.property_id.clone());
    metadata.insert("property_name".to_string(), property.name.clone());
    metadata.insert("check_in".to_string(), input.check_in.to_string());
    metadata.insert("check_out".to_string(), input.check_out.to_string());
    metadata.insert("nights".to_string(), quote.nights.to_string());
    metadata.insert("guests".to_string(), input.guests.to_string());
    create_intent.metadata = Some(metadata);

    match stripe::PaymentIntent::create(stripe_data.as_ref(), create_intent).await {
        Ok(intent) => HttpResponse::Ok().json(serde_json::json!({
            "clientSecret": intent.client_secret,
            "paymentIntentId": intent.id.to_string(),
            "amount": amount,
            "currency": "aed",
            "quote": quote,
        })),
        Err(e) => {
            println!("Error creating payment intent: {:?}", e);
            HttpResponse::InternalServerError()
                .body(format!("Failed to create payment intent: {}", e))
        }
    }
}

/*
    /api/payments/confirm

    Records the booking once the gateway reports the charge succeeded.
    The spreadsheet log afterwards is fire-and-forget: its failure never
    touches the confirmed state.
*/
pub async fn confirm_booking(
    stripe_data: web::Data<Arc<stripe::Client>>,
    mongo_data: web::Data<Arc<mongodb::Client>>,
    input: web::Json<ConfirmBookingInput>,
) -> impl Responder {
    println!("Confirming booking...");
    let input = input.into_inner();

    if let Err(msg) = validate_stay(input.check_in, input.check_out) {
        return HttpResponse::BadRequest().body(msg);
    }

    let intent_id = match stripe::PaymentIntentId::from_str(&input.payment_intent_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid payment intent id"),
    };

    let intent = match stripe::PaymentIntent::retrieve(stripe_data.as_ref(), &intent_id, &[]).await
    {
        Ok(intent) => intent,
        Err(e) => {
            println!("Error retrieving payment intent: {:?}", e);
            return HttpResponse::InternalServerError()
                .body(format!("Failed to retrieve payment intent: {}", e));
        }
    };

    if intent.status != stripe::PaymentIntentStatus::Succeeded {
        return HttpResponse::BadRequest().body(format!(
            "Payment has not succeeded. Current status: {:?}",
            intent.status
        ));
    }

    let client = mongo_data.into_inner();
    let property = match find_property(&client, &input.property_id).await {
        Ok(property) => property,
        Err(response) => return response,
    };

    let quote = PricingService::quote_for_property(
        &property,
        Some(input.check_in),
        Some(input.check_out),
    );
    let amount = PricingService::amount_minor(&quote);

    let reference = format!(
        "YGI-{}",
        &Uuid::new_v4().simple().to_string()[..8].to_uppercase()
    );
    let booking = Booking {
        id: None,
        reference,
        property_id: property.id.unwrap_or_else(ObjectId::new),
        property_name: property.name.clone(),
        guest_name: input.guest_name,
        guest_email: input.guest_email,
        guest_phone: input.guest_phone,
        check_in: input.check_in,
        check_out: input.check_out,
        guests: input.guests,
        quote,
        amount_minor: amount,
        currency: "aed".to_string(),
        payment_intent_id: input.payment_intent_id,
        status: "confirmed".to_string(),
        created_at: Some(bson::DateTime::now()),
    };

    let collection: mongodb::Collection<Booking> =
        client.database(DB_NAME).collection(BOOKING_COLLECTION);

    match collection.insert_one(&booking).await {
        Ok(_) => {
            let logged = booking.clone();
            tokio::spawn(async move {
                sheet_logger::log_booking(&logged).await;
            });
            HttpResponse::Ok().json(booking)
        }
        Err(err) => {
            eprintln!("Failed to insert booking: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to record booking")
        }
    }
}
