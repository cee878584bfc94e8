pub mod image_resolver;
pub mod pricing_service;
pub mod property_service;
pub mod sheet_logger;
