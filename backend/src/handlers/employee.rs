//! HTTP handlers for employee and attendance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::employee::{
    AttendanceRow, CreateEmployeeInput, DailySheetEntry, EmployeeRecord, EmployeeService,
    MarkAttendanceInput, MonthlySummaryEntry, UpdateEmployeeInput,
};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListEmployeesQuery {
    pub active_only: Option<bool>,
}

#[derive(Deserialize)]
pub struct DailySheetQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct MonthlySummaryQuery {
    pub year: i32,
    pub month: u32,
}

/// Create an employee
pub async fn create_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateEmployeeInput>,
) -> AppResult<(StatusCode, Json<EmployeeRecord>)> {
    let service = EmployeeService::new(state.db);
    let employee = service
        .create_employee(current_user.0.mill_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Get an employee
pub async fn get_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<EmployeeRecord>> {
    let service = EmployeeService::new(state.db);
    let employee = service
        .get_employee(current_user.0.mill_id, employee_id)
        .await?;
    Ok(Json(employee))
}

/// List employees
pub async fn list_employees(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListEmployeesQuery>,
) -> AppResult<Json<Vec<EmployeeRecord>>> {
    let service = EmployeeService::new(state.db);
    let employees = service
        .list_employees(current_user.0.mill_id, query.active_only.unwrap_or(false))
        .await?;
    Ok(Json(employees))
}

/// Update an employee
pub async fn update_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
    Json(input): Json<UpdateEmployeeInput>,
) -> AppResult<Json<EmployeeRecord>> {
    let service = EmployeeService::new(state.db);
    let employee = service
        .update_employee(current_user.0.mill_id, employee_id, input)
        .await?;
    Ok(Json(employee))
}

/// Mark attendance for one employee on one day
pub async fn mark_attendance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<MarkAttendanceInput>,
) -> AppResult<Json<AttendanceRow>> {
    let service = EmployeeService::new(state.db);
    let row = service.mark_attendance(current_user.0.mill_id, input).await?;
    Ok(Json(row))
}

/// Get the attendance sheet for a day
pub async fn daily_sheet(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DailySheetQuery>,
) -> AppResult<Json<Vec<DailySheetEntry>>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = EmployeeService::new(state.db);
    let sheet = service.daily_sheet(current_user.0.mill_id, date).await?;
    Ok(Json(sheet))
}

/// Get per-employee attendance counts for a month
pub async fn monthly_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MonthlySummaryQuery>,
) -> AppResult<Json<Vec<MonthlySummaryEntry>>> {
    let service = EmployeeService::new(state.db);
    let summary = service
        .monthly_summary(current_user.0.mill_id, query.year, query.month)
        .await?;
    Ok(Json(summary))
}
