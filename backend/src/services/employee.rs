//! Employee and attendance service
//!
//! Attendance is idempotent per employee and date: marking the same day
//! twice overwrites the earlier status instead of creating a second row.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::AttendanceStatus;
use shared::validation::validate_phone;

/// Employee and attendance service
#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

/// Employee row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployeeRecord {
    pub id: Uuid,
    pub mill_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub monthly_salary: Decimal,
    pub is_active: bool,
    pub joined_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub attendance_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub monthly_salary: Decimal,
    pub joined_on: Option<NaiveDate>,
}

/// Input for updating an employee
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub monthly_salary: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for marking attendance
#[derive(Debug, Deserialize)]
pub struct MarkAttendanceInput {
    pub employee_id: Uuid,
    pub status: AttendanceStatus,
    pub attendance_date: Option<NaiveDate>,
}

/// One employee's line in the daily sheet
#[derive(Debug, Serialize)]
pub struct DailySheetEntry {
    pub employee_id: Uuid,
    pub name: String,
    /// None when the day has not been marked yet
    pub status: Option<String>,
}

/// Per-employee attendance counts for a month
#[derive(Debug, Serialize, FromRow)]
pub struct MonthlySummaryEntry {
    pub employee_id: Uuid,
    pub name: String,
    pub monthly_salary: Decimal,
    pub present_days: i64,
    pub absent_days: i64,
    pub leave_days: i64,
    pub half_days: i64,
    pub payable_days: Decimal,
}

impl EmployeeService {
    /// Create a new EmployeeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an employee
    pub async fn create_employee(
        &self,
        mill_id: Uuid,
        input: CreateEmployeeInput,
    ) -> AppResult<EmployeeRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Employee name is required".to_string(),
            });
        }
        if input.monthly_salary < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "monthly_salary".to_string(),
                message: "Salary cannot be negative".to_string(),
            });
        }
        if let Some(phone) = &input.phone {
            if let Err(msg) = validate_phone(phone) {
                return Err(AppError::Validation {
                    field: "phone".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let joined_on = input.joined_on.unwrap_or_else(|| Utc::now().date_naive());

        let employee = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            INSERT INTO employees (mill_id, name, phone, designation, monthly_salary, joined_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, mill_id, name, phone, designation, monthly_salary, is_active,
                      joined_on, created_at, updated_at
            "#,
        )
        .bind(mill_id)
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.designation)
        .bind(input.monthly_salary)
        .bind(joined_on)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    /// Get an employee by id
    pub async fn get_employee(&self, mill_id: Uuid, employee_id: Uuid) -> AppResult<EmployeeRecord> {
        sqlx::query_as::<_, EmployeeRecord>(
            r#"
            SELECT id, mill_id, name, phone, designation, monthly_salary, is_active,
                   joined_on, created_at, updated_at
            FROM employees
            WHERE id = $1 AND mill_id = $2
            "#,
        )
        .bind(employee_id)
        .bind(mill_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))
    }

    /// List employees for a mill
    pub async fn list_employees(
        &self,
        mill_id: Uuid,
        active_only: bool,
    ) -> AppResult<Vec<EmployeeRecord>> {
        let employees = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            SELECT id, mill_id, name, phone, designation, monthly_salary, is_active,
                   joined_on, created_at, updated_at
            FROM employees
            WHERE mill_id = $1 AND ($2 = false OR is_active)
            ORDER BY name
            "#,
        )
        .bind(mill_id)
        .bind(active_only)
        .fetch_all(&self.db)
        .await?;

        Ok(employees)
    }

    /// Update an employee
    pub async fn update_employee(
        &self,
        mill_id: Uuid,
        employee_id: Uuid,
        input: UpdateEmployeeInput,
    ) -> AppResult<EmployeeRecord> {
        let existing = self.get_employee(mill_id, employee_id).await?;

        if let Some(salary) = input.monthly_salary {
            if salary < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "monthly_salary".to_string(),
                    message: "Salary cannot be negative".to_string(),
                });
            }
        }

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.or(existing.phone);
        let designation = input.designation.or(existing.designation);
        let monthly_salary = input.monthly_salary.unwrap_or(existing.monthly_salary);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let employee = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            UPDATE employees
            SET name = $1, phone = $2, designation = $3, monthly_salary = $4,
                is_active = $5, updated_at = NOW()
            WHERE id = $6 AND mill_id = $7
            RETURNING id, mill_id, name, phone, designation, monthly_salary, is_active,
                      joined_on, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&phone)
        .bind(&designation)
        .bind(monthly_salary)
        .bind(is_active)
        .bind(employee_id)
        .bind(mill_id)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    /// Mark attendance for one employee on one day, overwriting any
    /// earlier mark for that day
    pub async fn mark_attendance(
        &self,
        mill_id: Uuid,
        input: MarkAttendanceInput,
    ) -> AppResult<AttendanceRow> {
        // Scope check before the upsert
        self.get_employee(mill_id, input.employee_id).await?;

        let attendance_date = input
            .attendance_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            INSERT INTO attendance_records (employee_id, attendance_date, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (employee_id, attendance_date)
            DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
            RETURNING id, employee_id, attendance_date, status, created_at, updated_at
            "#,
        )
        .bind(input.employee_id)
        .bind(attendance_date)
        .bind(input.status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    /// Daily sheet: every active employee with their status for the day,
    /// unmarked employees included
    pub async fn daily_sheet(
        &self,
        mill_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<DailySheetEntry>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            r#"
            SELECT e.id, e.name, a.status
            FROM employees e
            LEFT JOIN attendance_records a
              ON a.employee_id = e.id AND a.attendance_date = $2
            WHERE e.mill_id = $1 AND e.is_active
            ORDER BY e.name
            "#,
        )
        .bind(mill_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(employee_id, name, status)| DailySheetEntry {
                employee_id,
                name,
                status,
            })
            .collect())
    }

    /// Monthly summary: per-employee day counts and payable days
    /// (half days count as 0.5)
    pub async fn monthly_summary(
        &self,
        mill_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<MonthlySummaryEntry>> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation {
                field: "month".to_string(),
                message: "Month must be between 1 and 12".to_string(),
            });
        }

        let from = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::Validation {
            field: "month".to_string(),
            message: "Invalid month".to_string(),
        })?;
        let to = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::Validation {
            field: "month".to_string(),
            message: "Invalid month".to_string(),
        })?;

        let entries = sqlx::query_as::<_, MonthlySummaryEntry>(
            r#"
            SELECT e.id AS employee_id,
                   e.name,
                   e.monthly_salary,
                   COUNT(*) FILTER (WHERE a.status = 'present') AS present_days,
                   COUNT(*) FILTER (WHERE a.status = 'absent') AS absent_days,
                   COUNT(*) FILTER (WHERE a.status = 'leave') AS leave_days,
                   COUNT(*) FILTER (WHERE a.status = 'half_day') AS half_days,
                   COALESCE(SUM(CASE a.status
                       WHEN 'present' THEN 1
                       WHEN 'half_day' THEN 0.5
                       ELSE 0
                   END), 0) AS payable_days
            FROM employees e
            LEFT JOIN attendance_records a
              ON a.employee_id = e.id
             AND a.attendance_date >= $2
             AND a.attendance_date < $3
            WHERE e.mill_id = $1
            GROUP BY e.id, e.name, e.monthly_salary
            ORDER BY e.name
            "#,
        )
        .bind(mill_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}
