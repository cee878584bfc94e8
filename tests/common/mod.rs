use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use std::sync::Arc;

use ygi_api::routes;

pub struct TestApp {
    pub mongo: Arc<mongodb::Client>,
    pub stripe: Arc<stripe::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        // No startup ping here; the routes exercised by these tests are
        // rejected or answered before any database call happens.
        let mongo = Arc::new(
            mongodb::Client::with_uri_str(&mongo_uri)
                .await
                .expect("Failed to parse MongoDB URI"),
        );
        let stripe = Arc::new(stripe::Client::new("sk_test_dummy"));

        Self { mongo, stripe }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(self.mongo.clone()))
            .app_data(web::Data::new(self.stripe.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(routes::health::health_check))
                    .service(
                        web::scope("/properties")
                            .route("", web::get().to(routes::property::get_all))
                            .route(
                                "/{id}/images",
                                web::get().to(routes::property::get_property_images),
                            )
                            .route("/{id}", web::get().to(routes::property::get_by_id)),
                    )
                    .route("/bookings/quote", web::post().to(routes::booking::quote))
                    .service(
                        web::scope("/payments")
                            .route(
                                "/payment-intent",
                                web::post().to(routes::payment::create_payment_intent),
                            )
                            .route("/confirm", web::post().to(routes::payment::confirm_booking)),
                    )
                    .service(
                        web::scope("/images")
                            .route(
                                "/filename/{path:.*}",
                                web::get().to(routes::images::get_image_by_filename),
                            )
                            .route("/{id}", web::get().to(routes::images::get_image)),
                    )
                    .configure(routes::admin::config),
            )
    }
}
