//! Policy DTOs

use serde::Serialize;

use domain_policy::PolicyRecord;

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub success: bool,
    pub policy: PolicyRecord,
}
