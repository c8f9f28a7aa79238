//! Integration tests for the HR/payroll API.
//!
//! This test suite drives the router end to end:
//! - Sessions (login, cookie and bearer auth, logout)
//! - Role enforcement and employee scoping
//! - Validation, duplicate and not-found errors
//! - Clocking in and out, and QR badge scans
//! - Payroll period lifecycle and payslips
//! - Dashboard summary and trend

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use hr_payroll::api::{AppState, create_router};
use hr_payroll::auth::hash_password;
use hr_payroll::config::ConfigLoader;
use hr_payroll::store::Store;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";
const EMPLOYEE_PASSWORD: &str = "employee-password";

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let config = ConfigLoader::load("./config/hrms").expect("Failed to load config");
        let store = Store::in_memory();
        store
            .seed_admin(ADMIN_EMAIL, &hash_password(ADMIN_PASSWORD).unwrap())
            .unwrap();
        Self {
            router: create_router(AppState::new(config, store)),
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .call(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    async fn create_employee(&self, admin: &str, employee_no: &str, department_id: Option<&str>) -> Value {
        let response = self
            .call(
                "POST",
                "/employees",
                Some(admin),
                Some(employee_body(employee_no, department_id)),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Creates an employee with a login account of the given role and
    /// returns (employee, token).
    async fn employee_with_login(
        &self,
        admin: &str,
        employee_no: &str,
        role: &str,
        department_id: Option<&str>,
    ) -> (Value, String) {
        let employee = self.create_employee(admin, employee_no, department_id).await;
        let email = format!("{}@login.example.com", employee_no.to_lowercase());
        let response = self
            .call(
                "POST",
                "/users",
                Some(admin),
                Some(json!({
                    "email": email,
                    "password": EMPLOYEE_PASSWORD,
                    "role": role,
                    "employee_id": employee["id"],
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let token = self.login(&email, EMPLOYEE_PASSWORD).await;
        (employee, token)
    }
}

fn employee_body(employee_no: &str, department_id: Option<&str>) -> Value {
    json!({
        "employee_no": employee_no,
        "first_name": "Juan",
        "last_name": format!("Dela Cruz {}", employee_no),
        "email": format!("{}@example.com", employee_no.to_lowercase()),
        "department_id": department_id,
        "position": "Clerk",
        "employment_status": "regular",
        "salary": {"type": "monthly", "amount": "22000"},
        "hired_on": "2026-01-05"
    })
}

fn decimal_field(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn assert_error(response: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["code"], code, "body: {}", response.body);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.call("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let app = TestApp::new();
    let response = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ADMIN@example.com", "password": ADMIN_PASSWORD})),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["role"], "ADMIN");
    assert!(response.body["user"].get("password_hash").is_none());

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("hr_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    let response = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": "not-the-password"})),
        )
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED");

    let unknown = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": ADMIN_PASSWORD})),
        )
        .await;
    // Same answer whether or not the account exists
    assert_eq!(unknown.body["message"], response.body["message"]);
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let app = TestApp::new();
    let token = app.admin().await;

    let request = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header(header::COOKIE, format!("hr_session={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["email"], ADMIN_EMAIL);
    assert!(response.body["employee"].is_null());
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthenticated() {
    let app = TestApp::new();
    let missing = app.call("GET", "/auth/me", None, None).await;
    assert_error(&missing, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED");

    let bad = app.call("GET", "/employees", Some("not.a.token"), None).await;
    assert_error(&bad, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let response = app.call("POST", "/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_deactivated_employee_loses_session() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (employee, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;

    let uri = format!("/employees/{}", employee["id"].as_str().unwrap());
    let response = app.call("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["active"], false);

    let me = app.call("GET", "/auth/me", Some(&token), None).await;
    assert_error(&me, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let response = app
        .call("POST", "/departments", Some(&admin), Some(json!({"description": "x"})))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let request = Request::builder()
        .method("POST")
        .uri("/departments")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.send(request).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "MALFORMED_JSON");
}

#[tokio::test]
async fn test_blank_name_is_validation_error() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let response = app
        .call("POST", "/departments", Some(&admin), Some(json!({"name": "   "})))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    assert_eq!(response.body["details"], "name");
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let response = app
        .call(
            "GET",
            "/departments/00000000-0000-0000-0000-000000000001",
            Some(&admin),
            None,
        )
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

    let bad_id = app
        .call("GET", "/departments/not-a-uuid", Some(&admin), None)
        .await;
    assert_error(&bad_id, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_employee_number() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_employee(&admin, "EMP-0001", None).await;

    let mut body = employee_body("EMP-0001", None);
    body["email"] = json!("other@example.com");
    let response = app.call("POST", "/employees", Some(&admin), Some(body)).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "DUPLICATE");
}

#[tokio::test]
async fn test_department_with_employees_cannot_be_deleted() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let department = app
        .call("POST", "/departments", Some(&admin), Some(json!({"name": "Operations"})))
        .await;
    assert_eq!(department.status, StatusCode::CREATED);
    let department_id = department.body["id"].as_str().unwrap();
    app.create_employee(&admin, "EMP-0001", Some(department_id)).await;

    let response = app
        .call("DELETE", &format!("/departments/{}", department_id), Some(&admin), None)
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "CONFLICT");
}

// =============================================================================
// Roles and scoping
// =============================================================================

#[tokio::test]
async fn test_employee_cannot_manage_records() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;

    let create = app
        .call("POST", "/departments", Some(&token), Some(json!({"name": "Ops"})))
        .await;
    assert_error(&create, StatusCode::UNAUTHORIZED, "FORBIDDEN");

    let periods = app.call("GET", "/payroll/periods", Some(&token), None).await;
    assert_error(&periods, StatusCode::UNAUTHORIZED, "FORBIDDEN");

    let dashboard = app.call("GET", "/dashboard/summary", Some(&token), None).await;
    assert_error(&dashboard, StatusCode::UNAUTHORIZED, "FORBIDDEN");
}

#[tokio::test]
async fn test_employee_sees_only_self() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (me, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;
    let other = app.create_employee(&admin, "EMP-0002", None).await;

    let list = app.call("GET", "/employees", Some(&token), None).await;
    assert_eq!(list.status, StatusCode::OK);
    let listed = list.body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], me["id"]);

    let uri = format!("/employees/{}", other["id"].as_str().unwrap());
    let response = app.call("GET", &uri, Some(&token), None).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "FORBIDDEN");
}

#[tokio::test]
async fn test_department_head_scoped_to_department() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let ops = app
        .call("POST", "/departments", Some(&admin), Some(json!({"name": "Operations"})))
        .await;
    let ops_id = ops.body["id"].as_str().unwrap().to_string();
    let (_, head) = app
        .employee_with_login(&admin, "EMP-0001", "DEPARTMENT_HEAD", Some(&ops_id))
        .await;
    app.create_employee(&admin, "EMP-0002", Some(&ops_id)).await;
    app.create_employee(&admin, "EMP-0003", None).await;

    let list = app.call("GET", "/employees", Some(&head), None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body.as_array().unwrap().len(), 2);

    let summary = app.call("GET", "/dashboard/summary", Some(&head), None).await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["headcount"]["active"], 2);

    let grades = app.call("GET", "/salary-grades", Some(&head), None).await;
    assert_error(&grades, StatusCode::UNAUTHORIZED, "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let me = app.call("GET", "/auth/me", Some(&admin), None).await;
    let uri = format!("/users/{}", me.body["user"]["id"].as_str().unwrap());

    let response = app.call("DELETE", &uri, Some(&admin), None).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "CONFLICT");

    let users = app.call("GET", "/users", Some(&admin), None).await;
    assert_eq!(users.body.as_array().unwrap().len(), 1);
    assert!(!users.body.to_string().contains("password_hash"));
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn test_clock_in_and_out() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (employee, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;

    let clock_in = app
        .call("POST", "/attendance/clock", Some(&token), Some(json!({"action": "IN"})))
        .await;
    assert_eq!(clock_in.status, StatusCode::OK, "{}", clock_in.body);
    assert_eq!(clock_in.body["attendance"]["employee_id"], employee["id"]);
    assert!(clock_in.body["attendance"]["time_out"].is_null());

    let again = app
        .call("POST", "/attendance/clock", Some(&token), Some(json!({"action": "IN"})))
        .await;
    assert_error(&again, StatusCode::BAD_REQUEST, "INVALID_TRANSITION");

    let clock_out = app
        .call("POST", "/attendance/clock", Some(&token), Some(json!({"action": "OUT"})))
        .await;
    assert_eq!(clock_out.status, StatusCode::OK, "{}", clock_out.body);
    assert!(!clock_out.body["attendance"]["time_out"].is_null());

    let records = app.call("GET", "/attendance", Some(&token), None).await;
    assert_eq!(records.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clock_unknown_action() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;
    let response = app
        .call("POST", "/attendance/clock", Some(&token), Some(json!({"action": "LUNCH"})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_cannot_clock_others() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;
    let other = app.create_employee(&admin, "EMP-0002", None).await;

    let response = app
        .call(
            "POST",
            "/attendance/clock",
            Some(&token),
            Some(json!({"action": "IN", "employee_id": other["id"]})),
        )
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "FORBIDDEN");

    let admin_without_employee = app
        .call("POST", "/attendance/clock", Some(&admin), Some(json!({"action": "IN"})))
        .await;
    assert_error(&admin_without_employee, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_qr_badge_scan() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let employee = app.create_employee(&admin, "EMP-0001", None).await;

    let uri = format!("/employees/{}/qr", employee["id"].as_str().unwrap());
    let badge = app.call("GET", &uri, Some(&admin), None).await;
    assert_eq!(badge.status, StatusCode::OK);
    let qr_token = badge.body["qr_token"].as_str().unwrap().to_string();

    let scan = app
        .call(
            "POST",
            "/attendance/scan",
            Some(&admin),
            Some(json!({"qr_token": qr_token, "action": "IN"})),
        )
        .await;
    assert_eq!(scan.status, StatusCode::OK, "{}", scan.body);
    assert_eq!(scan.body["attendance"]["source"], "qr_scan");
    assert_eq!(scan.body["employee_name"], "Juan Dela Cruz EMP-0001");

    let forged = app
        .call(
            "POST",
            "/attendance/scan",
            Some(&admin),
            Some(json!({"qr_token": "forged", "action": "IN"})),
        )
        .await;
    assert_error(&forged, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_session_token_is_not_a_badge() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let response = app
        .call(
            "POST",
            "/attendance/scan",
            Some(&admin),
            Some(json!({"qr_token": admin, "action": "IN"})),
        )
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_holidays_readable_by_everyone() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;

    let created = app
        .call(
            "POST",
            "/holidays",
            Some(&admin),
            Some(json!({"date": "2026-06-12", "name": "Independence Day", "kind": "regular"})),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let listed = app
        .call("GET", "/holidays?from=2026-06-01&to=2026-06-30", Some(&token), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body[0]["name"], "Independence Day");

    let forbidden = app
        .call(
            "POST",
            "/holidays",
            Some(&token),
            Some(json!({"date": "2026-12-25", "name": "Christmas", "kind": "regular"})),
        )
        .await;
    assert_error(&forbidden, StatusCode::UNAUTHORIZED, "FORBIDDEN");
}

// =============================================================================
// Payroll
// =============================================================================

fn period_body(name: &str, start: &str, end: &str) -> Value {
    json!({
        "name": name,
        "start_date": start,
        "end_date": end,
        "frequency": "semi_monthly"
    })
}

#[tokio::test]
async fn test_overlapping_period_rejected() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let first = app
        .call(
            "POST",
            "/payroll/periods",
            Some(&admin),
            Some(period_body("March 1-15", "2026-03-01", "2026-03-15")),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["status"], "open");

    let overlap = app
        .call(
            "POST",
            "/payroll/periods",
            Some(&admin),
            Some(period_body("March 10-25", "2026-03-10", "2026-03-25")),
        )
        .await;
    assert_error(&overlap, StatusCode::BAD_REQUEST, "CONFLICT");

    let backwards = app
        .call(
            "POST",
            "/payroll/periods",
            Some(&admin),
            Some(period_body("Backwards", "2026-04-15", "2026-04-01")),
        )
        .await;
    assert_error(&backwards, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_process_close_and_payslips() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (me, token) = app
        .employee_with_login(&admin, "EMP-0001", "EMPLOYEE", None)
        .await;
    let other = app.create_employee(&admin, "EMP-0002", None).await;

    let period = app
        .call(
            "POST",
            "/payroll/periods",
            Some(&admin),
            Some(period_body("March 1-15", "2026-03-01", "2026-03-15")),
        )
        .await;
    let period_id = period.body["id"].as_str().unwrap().to_string();

    let early_close = app
        .call("POST", &format!("/payroll/periods/{}/close", period_id), Some(&admin), None)
        .await;
    assert_error(&early_close, StatusCode::BAD_REQUEST, "CONFLICT");

    let processed = app
        .call("POST", &format!("/payroll/periods/{}/process", period_id), Some(&admin), None)
        .await;
    assert_eq!(processed.status, StatusCode::OK, "{}", processed.body);
    assert_eq!(processed.body["employees"], 2);
    assert_eq!(processed.body["period"]["status"], "processed");

    let item = &processed.body["items"][0];
    assert!(item["trace"].as_array().unwrap().len() > 5);
    assert_eq!(decimal_field(&item["monthly_rate"]), Decimal::new(22000, 0));

    let items = app
        .call("GET", &format!("/payroll/periods/{}/items", period_id), Some(&admin), None)
        .await;
    assert_eq!(items.body.as_array().unwrap().len(), 2);

    let own_uri = format!(
        "/payroll/periods/{}/items/{}",
        period_id,
        me["id"].as_str().unwrap()
    );
    let own = app.call("GET", &own_uri, Some(&token), None).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["employee_id"], me["id"]);

    let other_uri = format!(
        "/payroll/periods/{}/items/{}",
        period_id,
        other["id"].as_str().unwrap()
    );
    let theirs = app.call("GET", &other_uri, Some(&token), None).await;
    assert_error(&theirs, StatusCode::UNAUTHORIZED, "FORBIDDEN");

    let closed = app
        .call("POST", &format!("/payroll/periods/{}/close", period_id), Some(&admin), None)
        .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.body["status"], "closed");

    let reprocess = app
        .call("POST", &format!("/payroll/periods/{}/process", period_id), Some(&admin), None)
        .await;
    assert_error(&reprocess, StatusCode::BAD_REQUEST, "CONFLICT");

    let delete = app
        .call("DELETE", &format!("/payroll/periods/{}", period_id), Some(&admin), None)
        .await;
    assert_error(&delete, StatusCode::BAD_REQUEST, "CONFLICT");
}

#[tokio::test]
async fn test_benefit_enrollment_flows_into_payroll() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let employee = app.create_employee(&admin, "EMP-0001", None).await;
    let employee_id = employee["id"].as_str().unwrap();

    let benefit = app
        .call(
            "POST",
            "/benefits",
            Some(&admin),
            Some(json!({"name": "Rice Allowance", "kind": "allowance", "amount": "2000"})),
        )
        .await;
    assert_eq!(benefit.status, StatusCode::CREATED);

    let enroll_uri = format!("/employees/{}/benefits", employee_id);
    let enrolled = app
        .call(
            "POST",
            &enroll_uri,
            Some(&admin),
            Some(json!({"benefit_id": benefit.body["id"], "enrolled_on": "2026-01-05"})),
        )
        .await;
    assert_eq!(enrolled.status, StatusCode::CREATED, "{}", enrolled.body);

    let duplicate = app
        .call(
            "POST",
            &enroll_uri,
            Some(&admin),
            Some(json!({"benefit_id": benefit.body["id"]})),
        )
        .await;
    assert_error(&duplicate, StatusCode::BAD_REQUEST, "DUPLICATE");

    let listed = app.call("GET", &enroll_uri, Some(&admin), None).await;
    assert_eq!(listed.body[0]["benefit"]["name"], "Rice Allowance");
    assert_eq!(decimal_field(&listed.body[0]["monthly_amount"]), Decimal::new(2000, 0));

    let period = app
        .call(
            "POST",
            "/payroll/periods",
            Some(&admin),
            Some(period_body("March 1-15", "2026-03-01", "2026-03-15")),
        )
        .await;
    let processed = app
        .call(
            "POST",
            &format!("/payroll/periods/{}/process", period.body["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(processed.status, StatusCode::OK);
    // Semi-monthly share of a 2000 monthly allowance
    assert_eq!(
        decimal_field(&processed.body["items"][0]["allowances"]),
        Decimal::new(1000, 0)
    );
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_summary_and_trend() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_employee(&admin, "EMP-0001", None).await;
    app.create_employee(&admin, "EMP-0002", None).await;

    let summary = app.call("GET", "/dashboard/summary", Some(&admin), None).await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["headcount"]["active"], 2);
    assert!(summary.body["latest_period"].is_null());

    let trend = app
        .call("GET", "/dashboard/attendance-trend?days=3", Some(&admin), None)
        .await;
    assert_eq!(trend.status, StatusCode::OK);
    assert_eq!(trend.body.as_array().unwrap().len(), 3);

    let default_trend = app
        .call("GET", "/dashboard/attendance-trend", Some(&admin), None)
        .await;
    assert_eq!(default_trend.body.as_array().unwrap().len(), 7);

    let too_long = app
        .call("GET", "/dashboard/attendance-trend?days=365", Some(&admin), None)
        .await;
    assert_error(&too_long, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}
