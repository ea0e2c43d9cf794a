use serde::{Deserialize, Serialize};

/// Role of an authenticated user, as reported by the ledger service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A vendor account known to the ledger service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Phone number, used as the login identifier on every request
    pub phone: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Rent rule definition as stored by the ledger service.
///
/// Two historical shapes exist side by side in the backend sheet: the compact
/// range grammar (`"1-4:2600,5:2800,6-7:3400"`, 1=Monday .. 7=Sunday) and an
/// older flat weekday/weekend pair. Both deserialize here; the client
/// normalizes to one canonical form at ingestion and never branches on the
/// shape again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RentRules {
    Grammar(String),
    FlatRates { weekday: f64, weekend: f64 },
}

/// A market (stall location) with its rent rule definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub name: String,
    pub rent_rules: RentRules,
}

/// A single daily revenue record.
///
/// `profit` is authoritative as stored by the ledger service
/// (`amount - rent - parking_fee - cleaning_fee - other_cost`); the client
/// sums it verbatim and never re-derives it. Cost fields default to zero so
/// records written before those columns existed still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub id: String,
    /// Calendar date of the revenue, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub market: String,
    pub market_id: String,
    pub amount: f64,
    pub rent: f64,
    #[serde(default)]
    pub parking_fee: f64,
    #[serde(default)]
    pub cleaning_fee: f64,
    #[serde(default)]
    pub other_cost: f64,
    pub profit: f64,
    #[serde(default)]
    pub submitted_by: String,
    pub submitted_by_phone: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub submitted_at: String,
}

impl Revenue {
    /// Itemized costs excluding rent.
    pub fn itemized_costs(&self) -> f64 {
        self.parking_fee + self.cleaning_fee + self.other_cost
    }
}

/// Filter criteria for revenue queries. All fields optional; an empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueFilters {
    /// Inclusive lower bound, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by_phone: Option<String>,
}

impl RevenueFilters {
    /// Whether a record falls inside this filter. Date bounds compare
    /// lexicographically, which is correct for `YYYY-MM-DD` strings.
    pub fn matches(&self, record: &Revenue) -> bool {
        if let Some(from) = &self.date_from {
            if record.date < *from {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if record.date > *to {
                return false;
            }
        }
        if let Some(market_id) = &self.market_id {
            if record.market_id != *market_id {
                return false;
            }
        }
        if let Some(phone) = &self.submitted_by_phone {
            if record.submitted_by_phone != *phone {
                return false;
            }
        }
        true
    }
}

/// Totals over a filtered revenue view. Never persisted; always recomputed
/// from the current record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_amount: f64,
    pub total_rent: f64,
    /// Sum of parking, cleaning and other costs (rent excluded)
    pub total_costs: f64,
    pub total_profit: f64,
}

/// Response payload of the `getRevenues` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuesResponse {
    pub records: Vec<Revenue>,
    pub summary: RevenueSummary,
}

/// A clock-in/clock-out attendance record.
///
/// Created open (no `clock_out`) by a clock-in, closed by the matching
/// clock-out which also stamps `hours`. Manual backfill creates the record
/// directly in closed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub market_id: String,
    pub phone: String,
    /// Calendar date of the shift, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    pub clock_in: String,
    #[serde(default)]
    pub clock_out: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub note: String,
}

impl Attendance {
    /// An open record has been clocked in but not yet out.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// Filter criteria for attendance queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response payload of the attendance list actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub records: Vec<Attendance>,
    #[serde(default)]
    pub total: u32,
}

/// Uniform response envelope returned by every ledger action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Payload of a successful `login` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub phone: String,
    pub name: String,
    pub role: Role,
}

impl LoginResponse {
    /// Build the full user record the session layer works with. The login
    /// action does not echo the sheet row id, so the phone doubles as id.
    pub fn into_user(self) -> User {
        User {
            id: self.phone.clone(),
            phone: self.phone,
            name: self.name,
            role: self.role,
        }
    }
}

/// Payload of the combined `init` action (login plus market list, one round
/// trip on app start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    pub user: LoginResponse,
    pub markets: Vec<Market>,
}

/// Request payload for `submitRevenue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRevenueRequest {
    pub phone: String,
    pub date: String,
    pub market_id: String,
    pub amount: f64,
    pub rent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result payload of `submitRevenue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRevenueResult {
    pub id: String,
}

/// Request payload for `clockIn`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockInRequest {
    pub phone: String,
    pub market_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_manual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result payload of `clockIn`: the new open record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockInResult {
    pub id: String,
    pub clock_in: String,
}

/// Request payload for `clockOut`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockOutRequest {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_manual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_time: Option<String>,
}

/// Result payload of `clockOut`: closing timestamp and computed hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockOutResult {
    pub clock_out: String,
    pub hours: f64,
}

/// Request payload for `manualAttendance` (backfill of a full shift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAttendanceRequest {
    pub phone: String,
    pub market_id: String,
    pub date: String,
    pub clock_in: String,
    pub clock_out: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result payload of `manualAttendance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAttendanceResult {
    pub id: String,
    pub hours: f64,
}

/// Request payload for `updateAttendance` (admin correction).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub phone: String,
    pub attendance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
