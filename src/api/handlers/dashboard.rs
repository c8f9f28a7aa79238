//! Dashboard summary and attendance trend, scoped to the caller.

use axum::{extract::State, http::StatusCode};

use crate::auth::{Permission, Scope};
use crate::calculation::{DashboardInput, attendance_trend, build_summary};
use crate::models::{Employee, Schedule};
use crate::store::StoreData;

use crate::api::extract::{CurrentUser, QueryParams};
use crate::api::request::TrendQuery;
use crate::api::state::AppState;
use super::{HandlerResult, respond};

fn scoped_employees(data: &StoreData, scope: Scope) -> Vec<Employee> {
    data.employees
        .iter()
        .filter(|e| scope.includes(e))
        .cloned()
        .collect()
}

fn input<'a>(
    data: &'a StoreData,
    employees: &'a [Employee],
    default_schedule: &'a Schedule,
    state: &AppState,
) -> DashboardInput<'a> {
    DashboardInput {
        employees,
        departments: &data.departments,
        schedules: &data.schedules,
        default_schedule,
        attendance: &data.attendance,
        holidays: &data.holidays,
        periods: &data.periods,
        items: &data.items,
        now: state.now(),
    }
}

/// Handler for GET /dashboard/summary.
pub(crate) async fn summary(State(state): State<AppState>, current: CurrentUser) -> HandlerResult {
    current.require(Permission::ViewDashboard)?;
    let scope = current.scope();
    let summary = state.store().read(|data| {
        let employees = scoped_employees(data, scope);
        build_summary(&input(data, &employees, state.default_schedule(), &state))
    });
    respond(StatusCode::OK, summary)
}

/// Handler for GET /dashboard/attendance-trend.
pub(crate) async fn trend(
    State(state): State<AppState>,
    current: CurrentUser,
    QueryParams(query): QueryParams<TrendQuery>,
) -> HandlerResult {
    current.require(Permission::ViewDashboard)?;
    let days = query.window()?;
    let scope = current.scope();
    let points = state.store().read(|data| {
        let employees = scoped_employees(data, scope);
        let input = input(data, &employees, state.default_schedule(), &state);
        attendance_trend(&input, input.now.date(), days)
    });
    respond(StatusCode::OK, points)
}
