use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, PROPERTY_COLLECTION};
use crate::models::property::{PropertiesResponse, Property};
use crate::services::image_resolver::{
    self, is_local_host, resolve_candidates, PLACEHOLDER_IMAGE,
};
use crate::services::property_service;

fn properties(client: &Client) -> mongodb::Collection<Property> {
    client.database(DB_NAME).collection(PROPERTY_COLLECTION)
}

/*
    /api/properties
*/
pub async fn get_all(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();

    let listings = match properties(&client).find(doc! {}).await {
        Ok(cursor) => cursor.try_collect::<Vec<Property>>().await,
        Err(err) => Err(err),
    };

    match listings {
        Ok(listings) if !listings.is_empty() => HttpResponse::Ok().json(PropertiesResponse {
            success: true,
            properties: listings,
        }),
        Ok(_) => {
            // Empty catalog renders as a broken site; serve the snapshot
            println!("Property collection is empty, serving bundled fallback");
            HttpResponse::Ok().json(PropertiesResponse {
                success: true,
                properties: property_service::fallback_properties(),
            })
        }
        // A cursor that fails mid-stream is treated the same as a failed
        // query: a partial catalog never goes out
        Err(err) => {
            eprintln!("Failed to find properties: {:?}", err);
            HttpResponse::Ok().json(PropertiesResponse {
                success: true,
                properties: property_service::fallback_properties(),
            })
        }
    }
}

pub async fn get_by_id(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid property id"),
    };

    let client = data.into_inner();
    match properties(&client).find_one(doc! { "_id": object_id }).await {
        Ok(Some(property)) => HttpResponse::Ok().json(property),
        Ok(None) => HttpResponse::NotFound().body("Property not found"),
        Err(err) => {
            eprintln!("Failed to find property {}: {:?}", id, err);
            HttpResponse::InternalServerError().body("Failed to find property")
        }
    }
}

pub fn blob_store_base(req: &HttpRequest) -> String {
    std::env::var("BLOB_STORE_BASE_URL").unwrap_or_else(|_| {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    })
}

pub fn legacy_site_base() -> String {
    std::env::var("LEGACY_SITE_BASE_URL")
        .unwrap_or_else(|_| "https://www.ygiholidayhomes.com".to_string())
}

/*
    /api/properties/{id}/images

    Resolves each stored reference into its ordered candidate URLs so the
    frontend only has to walk the list on <img> error events.
*/
pub async fn get_property_images(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid property id"),
    };

    let client = data.into_inner();
    let property = match properties(&client).find_one(doc! { "_id": object_id }).await {
        Ok(Some(property)) => property,
        Ok(None) => return HttpResponse::NotFound().body("Property not found"),
        Err(err) => {
            eprintln!("Failed to find property {}: {:?}", id, err);
            return HttpResponse::InternalServerError().body("Failed to find property");
        }
    };

    let blob_base = blob_store_base(&req);
    let legacy_base = legacy_site_base();
    let local = is_local_host(req.connection_info().host());

    let images: Vec<serde_json::Value> = property
        .images
        .iter()
        .map(|reference| {
            serde_json::json!({
                "source": reference,
                "category": image_resolver::category(reference),
                "candidates": resolve_candidates(reference, &blob_base, &legacy_base, local),
            })
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "propertyId": id,
        "images": images,
        "placeholder": PLACEHOLDER_IMAGE,
    }))
}

pub async fn add(data: web::Data<Arc<Client>>, input: web::Json<Property>) -> impl Responder {
    let client = data.into_inner();

    let curr_time = bson::DateTime::now();
    let mut submission = input.into_inner();
    submission.created_at = Some(curr_time);
    submission.updated_at = Some(curr_time);

    match properties(&client).insert_one(&submission).await {
        Ok(result) => {
            submission.id = result.inserted_id.as_object_id();
            HttpResponse::Ok().json(submission)
        }
        Err(err) => {
            eprintln!("Failed to insert property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create property")
        }
    }
}

pub async fn update(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<Property>,
) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid property id"),
    };

    let client = data.into_inner();
    let mut submission = input.into_inner();
    submission.id = Some(object_id);
    submission.updated_at = Some(bson::DateTime::now());

    match properties(&client)
        .replace_one(doc! { "_id": object_id }, &submission)
        .await
    {
        Ok(result) if result.matched_count == 0 => {
            HttpResponse::NotFound().body("Property not found")
        }
        Ok(_) => HttpResponse::Ok().json(submission),
        Err(err) => {
            eprintln!("Failed to update property {}: {:?}", id, err);
            HttpResponse::InternalServerError().body("Failed to update property")
        }
    }
}

pub async fn delete(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid property id"),
    };

    let client = data.into_inner();
    match properties(&client).delete_one(doc! { "_id": object_id }).await {
        Ok(result) if result.deleted_count == 0 => {
            HttpResponse::NotFound().body("Property not found")
        }
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => {
            eprintln!("Failed to delete property {}: {:?}", id, err);
            HttpResponse::InternalServerError().body("Failed to delete property")
        }
    }
}
