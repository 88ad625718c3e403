//! Backend DTOs
//!
//! These mirror the JSON the ledger backend sends and accepts. The console
//! does not validate them beyond what deserialization requires; derived
//! metrics default every field so a zero-valued fallback can stand in for a
//! failed fetch.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identity of the signed-in admin, as kept in the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminInfo {
    pub uuid: String,
    pub name: String,
}

/// Body of `register_admin` and `login_admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub name: String,
    pub password: String,
}

/// Response of `register_admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: i64,
    pub name: String,
    pub uuid: String,
    pub created_date: NaiveDateTime,
}

/// Response of `login_admin`. Both `access_token` and `admin` must be present
/// for a session to be established.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub location: String,
    pub is_active: bool,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub location: String,
}

/// Per-user sum/deficit computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCalculation {
    pub user_id: i64,
    pub user_name: String,
    pub total_debit: f64,
    pub total_credit: f64,
    /// `total_debit - total_credit`
    pub sum_deficit: f64,
    /// "Surplus" or "Deficit"
    pub status: String,
}

/// A credit or debit entry against a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transaction_type", rename_all = "lowercase")]
pub enum UserTransaction {
    Credit {
        credit_amount: f64,
        round_off: f64,
    },
    Debit {
        bags: i64,
        product_type: String,
        kg: f64,
        cut_weight: f64,
        amount_per_kg: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreditEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub round_off: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDebitEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub bags: Option<i64>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub kg: Option<f64>,
    #[serde(default)]
    pub cut_weight: Option<f64>,
    #[serde(default)]
    pub net_weight: Option<f64>,
    #[serde(default)]
    pub amount_per_kg: Option<f64>,
    #[serde(default)]
    pub rough_amount: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub levi: Option<f64>,
    #[serde(default)]
    pub net_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecordDetails {
    pub user_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub credit_records: Vec<UserCreditEntry>,
    #[serde(default)]
    pub debit_records: Vec<UserDebitEntry>,
    #[serde(default)]
    pub total_credits: usize,
    #[serde(default)]
    pub total_debits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPanelEntry {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub username: String,
    pub location: String,
    pub phone_number: String,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
    #[serde(default)]
    pub debit_total: f64,
    #[serde(default)]
    pub credit_total: f64,
    #[serde(default)]
    pub profit_loss_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub username: String,
    pub location: String,
    pub phone_number: String,
}

/// Partial update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ClientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.phone_number.is_none()
    }
}

/// Per-client pending amount and profit/loss computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCalculation {
    pub client_id: i64,
    pub client_name: String,
    pub total_debit: f64,
    pub total_credit: f64,
    pub profit_loss_total: f64,
    pub pending_amount: f64,
    /// "Profit", "Loss" or "Neutral"
    pub status: String,
}

/// A credit or debit entry against a client, optionally booking a profit or
/// loss alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transaction_type", rename_all = "lowercase")]
pub enum ClientTransaction {
    Credit {
        credit_amount: f64,
        profit_loss: Option<f64>,
    },
    Debit {
        debit_amount: f64,
        profit_loss: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientLedgerEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLossEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecordDetails {
    pub client_id: i64,
    pub client_name: String,
    #[serde(default)]
    pub credit_records: Vec<ClientLedgerEntry>,
    #[serde(default)]
    pub debit_records: Vec<ClientLedgerEntry>,
    #[serde(default)]
    pub profit_loss_records: Vec<ProfitLossEntry>,
    #[serde(default)]
    pub total_credits: usize,
    #[serde(default)]
    pub total_debits: usize,
    #[serde(default)]
    pub total_profit_loss_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPanelEntry {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub pending_amount: f64,
}

/// Total pending amount across every user or every client of an admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingAmount {
    pub total_pending: f64,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub admin_name: String,
    pub total_users: u64,
    pub active_users: u64,
    pub total_clients: u64,
    pub users_pending_amount: f64,
    pub clients_pending_amount: f64,
    #[serde(default)]
    pub recent_users: Vec<User>,
    #[serde(default)]
    pub recent_clients: Vec<Client>,
}
