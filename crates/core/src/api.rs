//! Request and response model shared by the terminal and browser executors.
//!
//! The core only describes requests. An executor turns each [`FetchRequest`]
//! into HTTP, then reports back a [`FetchOutcome`] tagged with the same
//! [`Ticket`] so the answer finds its way to the binder that asked.

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::TabId;
use crate::error::ApiError;

pub const PROBE_BODY_LIMIT: usize = 500;
pub const LOG_LIMIT: usize = 4000;

pub mod endpoints {
    pub const HEALTH: &str = "/healthz";
    pub const JOBS: &str = "/jobs";
    pub const STORES: &str = "/stores/";
    pub const DEMAND_FORECAST: &str = "/demand/forecast";
    pub const DEMAND_INSIGHTS: &str = "/demand/insights";
    pub const ANALYTICS_PACK: &str = "/analytics/pack";
    pub const PER_RIDE: &str = "/earnings/per-ride";
    pub const HOTSPOTS: &str = "/hotspots/";
    pub const CREDIT_PROFILES: &str = "/credit/profiles";
    pub const MG_GUIDANCE: &str = "/mg/guidance";
    pub const ENERGY_DEMAND: &str = "/energy/demand";
    pub const MAINTENANCE_RISK: &str = "/maintenance/risk";
    pub const UNDERWRITING: &str = "/underwriting/credit";
    pub const CASHFLOW: &str = "/cashflow/forecast";
    pub const EXPANSION: &str = "/expansion/opps";
    pub const RETENTION: &str = "/retention/at-risk";
    pub const LAUNCH_STORES: &str = "/launch/stores";
    pub const LAUNCH_REPROCESS: &str = "/launch/reprocess";
    pub const BECKN_SEARCH: &str = "/beckn/bpp/search";
    pub const BECKN_SELECT: &str = "/beckn/bpp/select";
    pub const BECKN_CONFIRM: &str = "/beckn/bpp/confirm";
    pub const BECKN_STATUS: &str = "/beckn/bpp/status";
}

/// Where a response should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Health,
    Tab(TabId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RequestKind {
    Health,
    Collection,
    Slice { city: String },
    Stores,
    Plan { store: String },
    Tasks { store: String },
    Summary { store: String },
    Reprocess,
    Probe { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub route: Route,
    pub kind: RequestKind,
    pub generation: u64,
}

impl Ticket {
    pub const fn new(route: Route, kind: RequestKind, generation: u64) -> Self {
        Self {
            route,
            kind,
            generation,
        }
    }

    pub const fn for_tab(tab: TabId, kind: RequestKind, generation: u64) -> Self {
        Self::new(Route::Tab(tab), kind, generation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Method {
    Get,
    Post(Option<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub path: String,
    pub method: Method,
}

impl FetchRequest {
    pub fn get(ticket: Ticket, path: impl Into<String>) -> Self {
        Self {
            ticket,
            path: path.into(),
            method: Method::Get,
        }
    }

    pub fn post(ticket: Ticket, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            ticket,
            path: path.into(),
            method: Method::Post(body),
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }

    pub const fn is_post(&self) -> bool {
        matches!(self.method, Method::Post(_))
    }

    /// Answered with [`FetchOutcome::Status`] whatever the method or code.
    /// The health probe reads `status` out of error bodies too.
    pub const fn wants_raw_body(&self) -> bool {
        self.is_post() || matches!(self.ticket.kind, RequestKind::Health)
    }
}

/// What an executor hands back.
///
/// GETs answer with `Json` on a 2xx that parses, `Failed` otherwise.
/// Requests where [`FetchRequest::wants_raw_body`] holds always answer with
/// `Status`, whatever the code.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Json(Value),
    Status { code: u16, body: String },
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Status { code, .. } if !(200..300).contains(&code) => Err(ApiError::Status(code)),
            Self::Status { body, .. } => {
                serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
            }
            Self::Failed(err) => Err(err),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Json(_) => true,
            Self::Status { code, .. } => (200..300).contains(code),
            Self::Failed(_) => false,
        }
    }
}

/// Appends `?key=value`, encoding the value.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={}", urlencoding::encode(value))
}

/// Encodes one path segment, e.g. a store name with spaces.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Empty envelope the Beckn endpoints accept for smoke testing.
pub fn probe_envelope() -> Value {
    json!({ "context": {}, "message": {} })
}

/// Keeps the first `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(index, _)| &text[..index])
}

/// Keeps the last `limit` characters.
pub fn tail_chars(text: &str, limit: usize) -> &str {
    let count = text.chars().count();
    if count <= limit {
        return text;
    }
    text.char_indices()
        .nth(count - limit)
        .map_or(text, |(index, _)| &text[index..])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Checking,
    Reported(String),
    Unknown,
    Unreachable,
}

impl HealthStatus {
    pub fn request() -> FetchRequest {
        FetchRequest::get(
            Ticket::new(Route::Health, RequestKind::Health, 0),
            endpoints::HEALTH,
        )
    }

    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Json(body) => body
                .get("status")
                .and_then(crate::lenient::as_text)
                .map_or(Self::Unknown, Self::Reported),
            // any code: a 503 can still say {"status":"degraded"}
            FetchOutcome::Status { body, .. } => serde_json::from_str::<Value>(body)
                .map_or(Self::Unreachable, |value| {
                    Self::from_outcome(&FetchOutcome::Json(value))
                }),
            FetchOutcome::Failed(ApiError::Status(_)) => Self::Unknown,
            FetchOutcome::Failed(_) => Self::Unreachable,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Checking => "checking...",
            Self::Reported(status) => status,
            Self::Unknown => "unknown",
            Self::Unreachable => "unreachable",
        }
    }
}
