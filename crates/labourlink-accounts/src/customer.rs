//! # Customer Record

use serde::{Deserialize, Serialize};

use labourlink_core::{CustomerId, GeoPoint};

/// A customer registered in the district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Contact phone, disclosed to the worker after verification.
    pub phone: String,
    /// Contact email, disclosed to the worker after verification.
    pub email: String,
    /// Self-reported gender, if provided.
    pub gender: Option<String>,
    /// Last known location, if the customer shares one.
    pub current_location: Option<GeoPoint>,
}

impl Customer {
    /// A new customer record.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            gender: None,
            current_location: None,
        }
    }
}
