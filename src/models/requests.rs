use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Helpee, Helper, MatchingSettings};

/// Request to run one matching batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchingRequest {
    #[serde(default)]
    #[validate(nested)]
    pub helpers: Vec<Helper>,
    #[serde(default)]
    #[validate(nested)]
    pub helpees: Vec<Helpee>,
    /// Falls back to the server's configured coefficients when omitted
    #[serde(default)]
    pub settings: Option<MatchingSettings>,
}
