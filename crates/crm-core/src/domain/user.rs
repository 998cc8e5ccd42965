//! CRM user entity, as seen by the access layer

use chrono::{DateTime, Utc};
use crm_shared::{FranchiseId, GroupId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmUser {
    pub id: Uuid,

    pub email: String,
    pub display_name: String,

    pub group_id: Option<GroupId>,
    pub franchise_id: Option<FranchiseId>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}
