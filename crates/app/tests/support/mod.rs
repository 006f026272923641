//! In-process stand-in for the Cost Manager service.
#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::{Value, json};

const CATEGORIES: [&str; 5] = ["food", "health", "housing", "sport", "education"];

/// Ways the stub can misbehave.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    /// `about` answers 404 with a plain-text body.
    pub about_missing: bool,
    /// `add` echoes `sum + 1`.
    pub wrong_echo: bool,
    /// `report` omits the `sport` key.
    pub report_without_sport: bool,
}

#[derive(Debug, Clone)]
struct StoredCost {
    userid: i64,
    description: String,
    category: String,
    sum: f64,
    created_at: DateTime<Utc>,
}

struct Service {
    users: HashMap<i64, (&'static str, &'static str)>,
    costs: Mutex<Vec<StoredCost>>,
    faults: Faults,
}

type Shared = Arc<Service>;

/// A running stub; the server task stops with the test runtime.
pub struct Stub {
    pub addr: SocketAddr,
    service: Shared,
}

impl Stub {
    /// Serves the API under `/api` on an ephemeral port.
    pub async fn start(faults: Faults) -> Self {
        Self::start_at("/api", faults).await
    }

    /// Serves the API under `prefix` (empty for the root).
    pub async fn start_at(prefix: &str, faults: Faults) -> Self {
        let service = Arc::new(Service {
            users: HashMap::from([(123_123, ("mosh", "israeli"))]),
            costs: Mutex::new(Vec::new()),
            faults,
        });

        let api = Router::new()
            .route("/about", get(about))
            .route("/users/{user_id}", get(user_details))
            .route("/add", post(add_cost))
            .route("/report", get(monthly_report));
        let app = if prefix.trim_matches('/').is_empty() {
            api
        } else {
            Router::new().nest(prefix, api)
        }
        .with_state(Arc::clone(&service));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, service }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of costs stored so far.
    pub fn cost_count(&self) -> usize {
        self.service.costs.lock().unwrap().len()
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn about(State(service): State<Shared>) -> Response {
    if service.faults.about_missing {
        return (StatusCode::NOT_FOUND, "Cannot GET /api/about").into_response();
    }
    Json(json!([
        { "first_name": "Bar", "last_name": "Azarya" },
        { "first_name": "Aviv Meir", "last_name": "Ovadia" }
    ]))
    .into_response()
}

async fn user_details(State(service): State<Shared>, Path(user_id): Path<String>) -> Response {
    let Ok(id) = user_id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid user ID");
    };
    let Some((first_name, last_name)) = service.users.get(&id) else {
        return error(StatusCode::NOT_FOUND, "User not found");
    };
    let total: f64 = service
        .costs
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.userid == id)
        .map(|c| c.sum)
        .sum();

    Json(json!({
        "first_name": first_name,
        "last_name": last_name,
        "id": id,
        "total": total
    }))
    .into_response()
}

fn present(body: &Value, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

async fn add_cost(State(service): State<Shared>, Json(body): Json<Value>) -> Response {
    if !["userid", "description", "category", "sum"]
        .iter()
        .all(|field| present(&body, field))
    {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    }

    let category = body["category"].as_str().unwrap_or_default().to_string();
    if !CATEGORIES.contains(&category.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid category", "validCategories": CATEGORIES })),
        )
            .into_response();
    }

    let userid = body["userid"].as_i64().unwrap_or_default();
    if !service.users.contains_key(&userid) {
        return error(StatusCode::NOT_FOUND, "User not found");
    }

    let created_at = body["createdAt"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(Utc::now, |d| d.with_timezone(&Utc));
    let cost = StoredCost {
        userid,
        description: body["description"].as_str().unwrap_or_default().to_string(),
        category,
        sum: body["sum"].as_f64().unwrap_or_default(),
        created_at,
    };
    service.costs.lock().unwrap().push(cost.clone());

    let sum = if service.faults.wrong_echo {
        cost.sum + 1.0
    } else {
        cost.sum
    };
    Json(json!({
        "userid": cost.userid,
        "description": cost.description,
        "category": cost.category,
        "sum": sum,
        "createdAt": cost.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "_id": "65cc8a0f1c9d440000a1b2c3",
        "__v": 0
    }))
    .into_response()
}

async fn monthly_report(
    State(service): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let get = |key: &str| params.get(key).filter(|v| !v.is_empty());
    let (Some(id), Some(year), Some(month)) = (get("id"), get("year"), get("month")) else {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required query parameters: id, year, month",
        );
    };
    let parsed = (id.parse::<i64>(), year.parse::<i32>(), month.parse::<u32>());
    let (Ok(id), Ok(year), Ok(month)) = parsed else {
        return error(
            StatusCode::BAD_REQUEST,
            "Query parameters id, year, and month must be numbers",
        );
    };
    if !service.users.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "User not found");
    }

    let costs = service.costs.lock().unwrap();
    let mut grouped = serde_json::Map::new();
    for category in CATEGORIES {
        if service.faults.report_without_sport && category == "sport" {
            continue;
        }
        let items: Vec<Value> = costs
            .iter()
            .filter(|c| {
                c.userid == id
                    && c.category == category
                    && c.created_at.year() == year
                    && c.created_at.month() == month
            })
            .map(|c| {
                json!({ "sum": c.sum, "description": c.description, "day": c.created_at.day() })
            })
            .collect();
        grouped.insert(category.to_string(), Value::Array(items));
    }

    Json(json!({ "userid": id, "year": year, "month": month, "costs": grouped })).into_response()
}
