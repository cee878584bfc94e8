use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use base64::{engine::general_purpose, Engine as _};
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::{AsyncReadExt, AsyncWriteExt, StreamExt, TryStreamExt};
use mongodb::gridfs::GridFsBucket;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo::DB_NAME;
use crate::routes::property::{blob_store_base, legacy_site_base};
use crate::services::image_resolver::{is_local_host, resolve_candidates, ImageLoader};

#[derive(Debug)]
pub enum ImageStoreError {
    Base64DecodeError(String),
    StorageError(String),
    InvalidImageFormat(String),
}

impl std::fmt::Display for ImageStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageStoreError::Base64DecodeError(err) => write!(f, "Base64 decode error: {}", err),
            ImageStoreError::StorageError(err) => write!(f, "GridFS error: {}", err),
            ImageStoreError::InvalidImageFormat(err) => write!(f, "Invalid image format: {}", err),
        }
    }
}

impl std::error::Error for ImageStoreError {}

/// Base64 upload body used by the admin panel (the file input there reads
/// files as data URIs before posting).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImageUpload {
    pub data: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
}

fn bucket(client: &Client) -> GridFsBucket {
    client.database(DB_NAME).gridfs_bucket(None)
}

async fn store_blob(
    bucket: &GridFsBucket,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<ObjectId, ImageStoreError> {
    let mut stream = bucket
        .open_upload_stream(filename)
        .metadata(doc! { "contentType": content_type })
        .await
        .map_err(|e| ImageStoreError::StorageError(e.to_string()))?;

    let id = stream
        .id()
        .as_object_id()
        .ok_or_else(|| ImageStoreError::StorageError("Upload stream has no ObjectId".to_string()))?;

    stream
        .write_all(bytes)
        .await
        .map_err(|e| ImageStoreError::StorageError(e.to_string()))?;
    stream
        .close()
        .await
        .map_err(|e| ImageStoreError::StorageError(e.to_string()))?;

    Ok(id)
}

async fn serve_blob(client: Arc<Client>, filter: Document) -> HttpResponse {
    let bucket = bucket(&client);

    let mut cursor = match bucket.find(filter).await {
        Ok(cursor) => cursor,
        Err(err) => {
            eprintln!("GridFS lookup failed: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to look up image");
        }
    };

    let file = match cursor.try_next().await {
        Ok(Some(file)) => file,
        Ok(None) => return HttpResponse::NotFound().body("Image not found"),
        Err(err) => {
            eprintln!("GridFS lookup failed: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to look up image");
        }
    };

    let mut download = match bucket.open_download_stream(file.id.clone()).await {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("GridFS download failed: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to read image");
        }
    };

    let mut bytes = Vec::with_capacity(file.length as usize);
    if let Err(err) = download.read_to_end(&mut bytes).await {
        eprintln!("GridFS read failed: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to read image");
    }

    let content_type = file
        .metadata
        .as_ref()
        .and_then(|m| m.get_str("contentType").ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    HttpResponse::Ok().content_type(content_type).body(bytes)
}

/*
    /api/images/{id}
*/
pub async fn get_image(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    // Validate the 24-hex id before touching storage
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid image id"),
    };

    serve_blob(data.get_ref().clone(), doc! { "_id": object_id }).await
}

/*
    /api/images/filename/{path:.*}

    Legacy references are stored with their original relative path as the
    GridFS filename, so the decoded tail segment is the lookup key.
*/
pub async fn get_image_by_filename(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let filename = path.into_inner();
    if filename.is_empty() {
        return HttpResponse::BadRequest().body("Missing filename");
    }

    serve_blob(data.get_ref().clone(), doc! { "filename": filename }).await
}

pub async fn upload_image(data: web::Data<Arc<Client>>, mut payload: Multipart) -> impl Responder {
    let client = data.into_inner();
    let bucket = bucket(&client);
    let mut uploaded = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(String::from))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(chunk) => bytes.extend_from_slice(&chunk),
                Err(err) => {
                    eprintln!("Failed to read upload field: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to read upload data");
                }
            }
        }

        match store_blob(&bucket, &filename, &content_type, &bytes).await {
            Ok(id) => uploaded.push(serde_json::json!({
                "id": id.to_hex(),
                "filename": filename,
                "path": format!("/api/images/{}", id.to_hex()),
            })),
            Err(err) => {
                eprintln!("Failed to store image {}: {}", filename, err);
                return HttpResponse::InternalServerError().body("Failed to store image");
            }
        }
    }

    if uploaded.is_empty() {
        return HttpResponse::BadRequest().body("No file field in upload");
    }
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "images": uploaded }))
}

pub async fn upload_image_base64(
    data: web::Data<Arc<Client>>,
    input: web::Json<ImageUpload>,
) -> impl Responder {
    let input = input.into_inner();

    // Accept both bare base64 and full data URIs
    let base64_data = if input.data.starts_with("data:") {
        match input.data.split(',').nth(1) {
            Some(payload) => payload,
            None => return HttpResponse::BadRequest().body("Invalid data URI"),
        }
    } else {
        input.data.as_str()
    };

    let bytes = match general_purpose::STANDARD.decode(base64_data) {
        Ok(bytes) => bytes,
        Err(err) => {
            return HttpResponse::BadRequest()
                .body(format!("{}", ImageStoreError::Base64DecodeError(err.to_string())))
        }
    };

    let client = data.into_inner();
    match store_blob(&bucket(&client), &input.file_name, &input.file_type, &bytes).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "id": id.to_hex(),
            "filename": input.file_name,
            "path": format!("/api/images/{}", id.to_hex()),
        })),
        Err(err) => {
            eprintln!("Failed to store image {}: {}", input.file_name, err);
            HttpResponse::InternalServerError().body("Failed to store image")
        }
    }
}

pub async fn delete_image(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(_) => return HttpResponse::BadRequest().body("Invalid image id"),
    };

    let client = data.into_inner();
    match bucket(&client).delete(Bson::ObjectId(object_id)).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => {
            eprintln!("Failed to delete image {}: {:?}", id, err);
            HttpResponse::NotFound().body("Image not found")
        }
    }
}

/*
    /api/admin/images/audit/{property_id}

    Walks a listing's image references server-side, trying each candidate
    URL in order the same way the site's <img> fallback does, and reports
    which references resolve and which are dead. Lets an admin spot broken
    legacy paths without clicking through the whole site.
*/
pub async fn audit_property_images(
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
    let collection: mongodb::Collection<crate::models::property::Property> = client
        .database(DB_NAME)
        .collection(crate::db::mongo::PROPERTY_COLLECTION);

    let property = match collection.find_one(doc! { "_id": object_id }).await {
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
    let http = reqwest::Client::new();

    let mut report = Vec::new();
    for reference in &property.images {
        let candidates = resolve_candidates(reference, &blob_base, &legacy_base, local);
        let mut loader = ImageLoader::new(candidates);
        let mut attempts = 0;
        let mut resolved: Option<String> = None;

        while !loader.is_exhausted() {
            let candidate = loader.current().to_string();
            attempts += 1;
            let ok = match http.head(&candidate).send().await {
                Ok(response) => response.status().is_success(),
                Err(_) => false,
            };
            if ok {
                resolved = Some(candidate);
                break;
            }
            loader.on_load_failed();
        }

        report.push(serde_json::json!({
            "source": reference,
            "resolved": resolved,
            "attempts": attempts,
            "broken": loader.is_exhausted(),
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "propertyId": id,
        "images": report,
    }))
}
