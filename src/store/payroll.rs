//! Payroll periods and their items.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{PayrollInput, compute_payroll_item, monthly_rate, resolve_schedule};
use crate::config::PayrollConfig;
use crate::error::{HrError, HrResult};
use crate::models::{
    Attendance, Benefit, BenefitEnrollment, PayrollItem, PayrollPeriod, PeriodStatus, Schedule,
};

use super::{Store, StoreData};

/// Settings and clock readings used when processing a period.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Payroll rules.
    pub config: &'a PayrollConfig,
    /// Schedule for employees without one.
    pub default_schedule: &'a Schedule,
    /// Local date; later days are not counted absent.
    pub today: NaiveDate,
    /// Local time stamped on the period.
    pub now: NaiveDateTime,
}

fn find_period(data: &StoreData, id: Uuid) -> HrResult<&PayrollPeriod> {
    data.periods
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| HrError::not_found("payroll period", id))
}

fn compute_items(
    data: &StoreData,
    period: &PayrollPeriod,
    ctx: &ProcessContext<'_>,
) -> HrResult<Vec<PayrollItem>> {
    data.employees
        .iter()
        .filter(|e| e.active && e.hired_on <= period.end_date)
        .map(|employee| -> HrResult<PayrollItem> {
            let attendance: Vec<Attendance> = data
                .attendance
                .iter()
                .filter(|a| a.employee_id == employee.id && period.contains_date(a.date))
                .cloned()
                .collect();
            let benefits: Vec<(BenefitEnrollment, Benefit)> = data
                .enrollments
                .iter()
                .filter(|e| e.employee_id == employee.id)
                .filter_map(|e| {
                    data.benefits
                        .iter()
                        .find(|b| b.id == e.benefit_id)
                        .map(|b| (e.clone(), b.clone()))
                })
                .collect();

            let input = PayrollInput {
                period,
                employee,
                monthly_rate: monthly_rate(employee, &data.salary_grades)?,
                schedule: resolve_schedule(employee, &data.schedules, ctx.default_schedule),
                attendance: &attendance,
                holidays: &data.holidays,
                benefits: &benefits,
                deduction_types: &data.deduction_types,
                today: ctx.today,
            };
            Ok(compute_payroll_item(&input, ctx.config))
        })
        .collect()
}

impl Store {
    /// Lists payroll periods, most recent first.
    pub fn list_periods(&self) -> Vec<PayrollPeriod> {
        self.read(|data| {
            let mut periods = data.periods.clone();
            periods.sort_by(|a, b| b.start_date.cmp(&a.start_date));
            periods
        })
    }

    /// Fetches a payroll period.
    pub fn get_period(&self, id: Uuid) -> HrResult<PayrollPeriod> {
        self.read(|data| find_period(data, id).cloned())
    }

    /// Adds a period that overlaps no existing one.
    pub fn create_period(&self, period: PayrollPeriod) -> HrResult<PayrollPeriod> {
        if period.start_date > period.end_date {
            return Err(HrError::validation(
                "end_date",
                "must be on or after start_date",
            ));
        }

        self.write(|data| {
            if let Some(existing) = data
                .periods
                .iter()
                .find(|p| p.overlaps(period.start_date, period.end_date))
            {
                return Err(HrError::conflict(format!(
                    "overlaps payroll period '{}' ({} to {})",
                    existing.name, existing.start_date, existing.end_date
                )));
            }
            data.periods.push(period.clone());
            Ok(period)
        })
    }

    /// Deletes a period that is not closed, with its items.
    pub fn delete_period(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if find_period(data, id)?.is_closed() {
                return Err(HrError::conflict("closed payroll periods cannot be deleted"));
            }
            data.periods.retain(|p| p.id != id);
            data.items.retain(|i| i.period_id != id);
            Ok(())
        })
    }

    /// Computes items for every active employee and replaces the period's
    /// previous items.
    ///
    /// An open or processed period may be processed again; a closed one
    /// may not.
    pub fn process_period(
        &self,
        id: Uuid,
        ctx: &ProcessContext<'_>,
    ) -> HrResult<(PayrollPeriod, Vec<PayrollItem>)> {
        self.write(|data| {
            let period = find_period(data, id)?;
            if period.is_closed() {
                return Err(HrError::conflict("payroll period is closed"));
            }

            let items = compute_items(data, period, ctx)?;

            let mut updated = period.clone();
            updated.status = PeriodStatus::Processed;
            updated.processed_at = Some(ctx.now);

            data.items.retain(|i| i.period_id != id);
            data.items.extend(items.iter().cloned());
            if let Some(slot) = data.periods.iter_mut().find(|p| p.id == id) {
                *slot = updated.clone();
            }

            info!(
                period_id = %id,
                employees = items.len(),
                "Payroll period processed"
            );
            Ok((updated, items))
        })
    }

    /// Closes a processed period. Closed periods and their items are final.
    pub fn close_period(&self, id: Uuid) -> HrResult<PayrollPeriod> {
        self.write(|data| {
            let period = data
                .periods
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| HrError::not_found("payroll period", id))?;
            match period.status {
                PeriodStatus::Processed => {
                    period.status = PeriodStatus::Closed;
                    Ok(period.clone())
                }
                PeriodStatus::Open => Err(HrError::conflict(
                    "payroll period must be processed before closing",
                )),
                PeriodStatus::Closed => Err(HrError::conflict("payroll period is already closed")),
            }
        })
    }

    /// Lists a period's items in employee order.
    pub fn list_items(&self, period_id: Uuid) -> HrResult<Vec<PayrollItem>> {
        self.read(|data| {
            find_period(data, period_id)?;
            let mut items: Vec<PayrollItem> = data
                .items
                .iter()
                .filter(|i| i.period_id == period_id)
                .cloned()
                .collect();
            let employee_no = |id: Uuid| {
                data.employees
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.employee_no.clone())
                    .unwrap_or_default()
            };
            items.sort_by_cached_key(|i| employee_no(i.employee_id));
            Ok(items)
        })
    }

    /// Fetches one employee's item (payslip) for a period.
    pub fn get_item(&self, period_id: Uuid, employee_id: Uuid) -> HrResult<PayrollItem> {
        self.read(|data| {
            find_period(data, period_id)?;
            data.items
                .iter()
                .find(|i| i.period_id == period_id && i.employee_id == employee_id)
                .cloned()
                .ok_or_else(|| HrError::not_found("payroll item", employee_id))
        })
    }
}
