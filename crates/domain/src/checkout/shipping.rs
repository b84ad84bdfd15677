use serde::{Deserialize, Serialize};

use crate::user::Mobile;

/// Shipping details collected by the first checkout steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: Mobile,
    #[serde(default)]
    pub is_international: bool,
    /// Set once the shipping step has been submitted.
    #[serde(default)]
    pub is_done: bool,
}
