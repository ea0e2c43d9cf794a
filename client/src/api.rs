//! Remote boundary: the ledger service behind a single action-dispatch URL.
//!
//! Every operation is a POST of `{"action": ..., ...payload}` to one
//! endpoint, answered with the uniform `{success, data?, error?}` envelope.
//! Transport failures and undecodable bodies collapse into the same fixed
//! network-error message as business failures; callers cannot and should not
//! distinguish them. No retries happen at this layer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use shared::{
    ApiResponse, Attendance, AttendanceFilters, AttendanceResponse, ClockInRequest, ClockInResult,
    ClockOutRequest, ClockOutResult, InitResponse, LoginResponse, ManualAttendanceRequest,
    ManualAttendanceResult, Market, RevenueFilters, RevenuesResponse, SubmitRevenueRequest,
    SubmitRevenueResult, UpdateAttendanceRequest, User,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed user-facing message for transport-level failures.
pub const NETWORK_ERROR: &str = "network error, please try again later";

/// Failure of a ledger call, carrying the user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LedgerError(pub String);

impl LedgerError {
    fn network() -> Self {
        Self(NETWORK_ERROR.to_string())
    }
}

/// Client for the remote ledger service.
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct PhoneOnly<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct ListQuery<'a, F: Serialize> {
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

#[derive(Serialize)]
struct DeleteRevenue<'a> {
    phone: &'a str,
    id: &'a str,
}

/// Merge the action name into the payload object.
fn action_body(action: &str, payload: Value) -> Value {
    let mut body = json!({ "action": action });
    if let (Value::Object(body_map), Value::Object(payload_map)) = (&mut body, payload) {
        body_map.extend(payload_map);
    }
    body
}

impl LedgerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// One round trip to the ledger. `Ok(None)` means the service reported
    /// success without a payload (void actions).
    async fn dispatch<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &impl Serialize,
    ) -> Result<Option<T>, LedgerError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| LedgerError(format!("failed to encode request: {}", e)))?;
        let body = action_body(action, payload);

        debug!("ledger request `{}`", action);
        let response = match self.http.post(&self.base_url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("ledger transport failure for `{}`: {}", action, e);
                return Err(LedgerError::network());
            }
        };

        let envelope: ApiResponse<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("undecodable ledger response for `{}`: {}", action, e);
                return Err(LedgerError::network());
            }
        };

        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(LedgerError(
                envelope.error.unwrap_or_else(|| NETWORK_ERROR.to_string()),
            ))
        }
    }

    /// As [`Self::dispatch`], for actions whose success always carries data.
    async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &impl Serialize,
    ) -> Result<T, LedgerError> {
        self.dispatch(action, payload)
            .await?
            .ok_or_else(|| LedgerError(format!("empty response for `{}`", action)))
    }

    /// Verify a phone number and return the account.
    pub async fn login(&self, phone: &str) -> Result<LoginResponse, LedgerError> {
        self.request("login", &PhoneOnly { phone }).await
    }

    /// Combined login plus market list, saving a round trip on app start.
    pub async fn init(&self, phone: &str) -> Result<InitResponse, LedgerError> {
        self.request("init", &PhoneOnly { phone }).await
    }

    /// All markets with their rent rule encodings.
    pub async fn get_markets(&self) -> Result<Vec<Market>, LedgerError> {
        self.request("getMarkets", &json!({})).await
    }

    /// Submit a daily revenue entry.
    pub async fn submit_revenue(
        &self,
        request: &SubmitRevenueRequest,
    ) -> Result<SubmitRevenueResult, LedgerError> {
        self.request("submitRevenue", request).await
    }

    /// Revenue records plus the server-side summary, optionally filtered and
    /// paginated.
    pub async fn get_revenues(
        &self,
        phone: &str,
        filters: Option<&RevenueFilters>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<RevenuesResponse, LedgerError> {
        let query = ListQuery {
            phone,
            filters,
            limit,
            offset,
        };
        self.request("getRevenues", &query).await
    }

    /// User directory (admin only).
    pub async fn get_users(&self, phone: &str) -> Result<Vec<User>, LedgerError> {
        self.request("getUsers", &PhoneOnly { phone }).await
    }

    /// Delete a single revenue record.
    pub async fn delete_revenue(&self, phone: &str, id: &str) -> Result<(), LedgerError> {
        self.dispatch::<Value>("deleteRevenue", &DeleteRevenue { phone, id })
            .await?;
        Ok(())
    }

    /// Open an attendance record (start of shift).
    pub async fn clock_in(&self, request: &ClockInRequest) -> Result<ClockInResult, LedgerError> {
        self.request("clockIn", request).await
    }

    /// Close the open attendance record; the service computes and stamps the
    /// worked hours.
    pub async fn clock_out(
        &self,
        request: &ClockOutRequest,
    ) -> Result<ClockOutResult, LedgerError> {
        self.request("clockOut", request).await
    }

    /// Backfill a complete shift; validate locally with
    /// [`crate::domain::attendance::validate_manual`] first.
    pub async fn manual_attendance(
        &self,
        request: &ManualAttendanceRequest,
    ) -> Result<ManualAttendanceResult, LedgerError> {
        self.request("manualAttendance", request).await
    }

    /// Today's attendance records for the caller.
    pub async fn get_today_attendance(&self, phone: &str) -> Result<Vec<Attendance>, LedgerError> {
        self.request("getTodayAttendance", &PhoneOnly { phone })
            .await
    }

    /// The caller's own attendance history.
    pub async fn get_my_attendance(
        &self,
        phone: &str,
        filters: Option<&AttendanceFilters>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<AttendanceResponse, LedgerError> {
        let query = ListQuery {
            phone,
            filters,
            limit,
            offset,
        };
        self.request("getMyAttendance", &query).await
    }

    /// Attendance across all users (admin only).
    pub async fn get_all_attendance(
        &self,
        phone: &str,
        filters: Option<&AttendanceFilters>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<AttendanceResponse, LedgerError> {
        let query = ListQuery {
            phone,
            filters,
            limit,
            offset,
        };
        self.request("getAllAttendance", &query).await
    }

    /// Correct an attendance record (admin only).
    pub async fn update_attendance(
        &self,
        request: &UpdateAttendanceRequest,
    ) -> Result<(), LedgerError> {
        self.dispatch::<Value>("updateAttendance", request).await?;
        Ok(())
    }
}
