use serde::{Deserialize, Serialize};

/// Display fields of a destination copied onto bookings and the favorites side table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enname: Option<String>,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encountry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
}

impl DestinationSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enname: None,
            country: country.into(),
            encountry: None,
            image: None,
            price: None,
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = Some(price);
        self
    }
}
