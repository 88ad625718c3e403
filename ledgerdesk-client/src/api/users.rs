//! Users: vendors whose balance is tracked as a sum/deficit

use super::{EntityResource, LedgerApi};
use ledgerdesk_core::{
    LedgerResult, NewUser, User, UserCalculation, UserPanelEntry, UserRecordDetails,
    UserTransaction,
};
use tracing::info;

pub struct Users;

impl EntityResource for Users {
    type Record = User;
    type Metrics = UserCalculation;
    type NewRecord = NewUser;
    type Transaction = UserTransaction;
    type RecordDetails = UserRecordDetails;
    type PanelEntry = UserPanelEntry;

    const LABEL: &'static str = "User";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn record_id(record: &User) -> i64 {
        record.id
    }

    fn fallback_metrics() -> UserCalculation {
        UserCalculation {
            sum_deficit: 0.0,
            status: "N/A".to_string(),
            ..Default::default()
        }
    }
}

impl LedgerApi {
    /// Enable or disable a user.
    pub async fn set_user_active(&self, id: i64, active: bool) -> LedgerResult<User> {
        let action = if active { "enable" } else { "disable" };
        info!(user_id = id, action, "Changing user status");
        let path = self.entity_path::<Users>(id, action)?;
        self.gateway().put_empty(&path).await
    }
}
