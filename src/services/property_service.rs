use crate::models::property::Property;

/// Bundled catalog snapshot served when the database is unreachable or the
/// collection comes back empty. The public site should never render an
/// empty property grid.
pub fn fallback_properties() -> Vec<Property> {
    match serde_json::from_str(include_str!("../../data/fallback_properties.json")) {
        Ok(properties) => properties,
        Err(e) => {
            eprintln!("Bundled fallback snapshot failed to parse: {}", e);
            Vec::new()
        }
    }
}
