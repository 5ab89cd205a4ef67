//! Transfer shape exchanged with the request layer.

use serde::{Deserialize, Serialize};

/// Flattened person view: person, phone and address fields in one shape.
///
/// `id` is only populated on list results and on the view returned by a
/// create; it is never read back from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub name: String,
    pub age: i32,
    #[serde(rename = "phone_number")]
    pub number: String,
    pub city: String,
    pub state: String,
    pub street1: String,
    pub street2: String,
    #[serde(rename = "zip_code")]
    pub zip: String,
}
