use actix_web::{web, HttpResponse, Responder};

use crate::middleware::auth::AdminAuth;
use crate::routes::{images, property};

/// Token check endpoint for the admin panel login screen.
pub async fn verify() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminAuth)
            .route("/auth/verify", web::get().to(verify))
            .route("/properties", web::post().to(property::add))
            .route("/properties/{id}", web::put().to(property::update))
            .route("/properties/{id}", web::delete().to(property::delete))
            .route("/images", web::post().to(images::upload_image))
            .route("/images/base64", web::post().to(images::upload_image_base64))
            .route(
                "/images/audit/{id}",
                web::get().to(images::audit_property_images),
            )
            .route("/images/{id}", web::delete().to(images::delete_image)),
    );
}
