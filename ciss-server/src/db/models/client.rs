//! Client (posting company) model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers::option_record_id;

/// Client company that guards are posted to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,

    /// Display name, unique across clients
    pub name: String,

    /// Whether enrollees for this client must supply a resource id number
    #[serde(default)]
    pub requires_resource_id: bool,

    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a client
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub requires_resource_id: bool,
}

/// Payload for renaming / updating a client
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub requires_resource_id: Option<bool>,
}
