use serde::Serialize;

use crate::error::AppError;
use crate::geo::GeoPoint;

/// An entry in the site registry, the lookup the assignment flow uses to
/// resolve a site code to its coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub code: String,
    pub name: String,
    pub location: GeoPoint,
}

impl Site {
    pub fn create(code: &str, name: &str, location: GeoPoint) -> Result<Self, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidArgument("site code is required".to_string()));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidArgument("site name is required".to_string()));
        }

        Ok(Self {
            code: code.to_uppercase(),
            name: name.to_string(),
            location,
        })
    }
}
