//! In-memory record store with an optional JSON snapshot.
//!
//! Every record lives in one [`StoreData`] behind a single `parking_lot`
//! lock. Writes run a closure under the write lock, so each uniqueness or
//! reference check and the mutation it guards happen atomically. Operations
//! validate before they mutate; an operation that returns an error leaves the
//! data untouched.
//!
//! When a snapshot path is configured the whole state is written to it after
//! every successful write (temp file plus rename) and loaded at startup.

use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{HrError, HrResult};
use crate::models::{
    Attendance, Benefit, BenefitEnrollment, DeductionType, Department, Employee, Holiday,
    PayrollItem, PayrollPeriod, SalaryGrade, Schedule, User,
};

mod attendance;
mod compensation;
mod organization;
mod payroll;
mod people;

pub use attendance::{AttendanceFilter, OVERNIGHT_CLOCK_OUT_WINDOW_HOURS};
pub use payroll::ProcessContext;
pub use people::EmployeeFilter;

/// Every record the service keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    /// Login accounts.
    #[serde(default)]
    pub users: Vec<User>,
    /// Departments.
    #[serde(default)]
    pub departments: Vec<Department>,
    /// Work schedules.
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    /// Salary grade table.
    #[serde(default)]
    pub salary_grades: Vec<SalaryGrade>,
    /// Employees, including deactivated ones.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Daily attendance records.
    #[serde(default)]
    pub attendance: Vec<Attendance>,
    /// Holiday calendar.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Configured deduction types.
    #[serde(default)]
    pub deduction_types: Vec<DeductionType>,
    /// Benefit catalogue.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Benefit enrollments.
    #[serde(default)]
    pub enrollments: Vec<BenefitEnrollment>,
    /// Payroll periods.
    #[serde(default)]
    pub periods: Vec<PayrollPeriod>,
    /// Payroll items of processed periods.
    #[serde(default)]
    pub items: Vec<PayrollItem>,
}

/// The shared record store.
#[derive(Debug, Default)]
pub struct Store {
    data: RwLock<StoreData>,
    snapshot_path: Option<PathBuf>,
}

impl Store {
    /// Creates an empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a store backed by a JSON snapshot.
    ///
    /// Loads the snapshot if the file exists, otherwise starts empty and
    /// creates the file on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`HrError::Internal`] if the snapshot exists but cannot be
    /// read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> HrResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let bytes = std::fs::read(&path).map_err(|e| {
                HrError::internal(format!("failed to read snapshot {}: {}", path.display(), e))
            })?;
            let data: StoreData = serde_json::from_slice(&bytes).map_err(|e| {
                HrError::internal(format!("failed to parse snapshot {}: {}", path.display(), e))
            })?;
            info!(
                path = %path.display(),
                employees = data.employees.len(),
                attendance = data.attendance.len(),
                "Loaded store snapshot"
            );
            data
        } else {
            info!(path = %path.display(), "No snapshot found, starting empty");
            StoreData::default()
        };

        Ok(Self {
            data: RwLock::new(data),
            snapshot_path: Some(path),
        })
    }

    /// Runs a read-only closure against the data.
    pub fn read<T>(&self, op: impl FnOnce(&StoreData) -> T) -> T {
        op(&self.data.read())
    }

    /// Runs a mutating closure under the write lock and snapshots on success.
    ///
    /// A failed snapshot is logged; the in-memory change stands.
    pub fn write<T>(&self, op: impl FnOnce(&mut StoreData) -> HrResult<T>) -> HrResult<T> {
        let mut data = self.data.write();
        let result = op(&mut data)?;

        if let Some(path) = &self.snapshot_path {
            let start = Instant::now();
            match persist_snapshot(path, &data) {
                Ok(()) => debug!(
                    path = %path.display(),
                    duration_us = start.elapsed().as_micros() as u64,
                    "Snapshot written"
                ),
                Err(e) => error!(path = %path.display(), error = %e, "Snapshot write failed"),
            }
        }

        Ok(result)
    }

    /// Returns a copy of all data.
    pub fn export(&self) -> StoreData {
        self.read(|data| data.clone())
    }
}

fn persist_snapshot(path: &Path, data: &StoreData) -> HrResult<()> {
    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| HrError::internal(format!("snapshot serialization failed: {}", e)))?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| HrError::internal(e.to_string()))?;

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot");
    let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    std::fs::write(&tmp, &bytes).map_err(|e| HrError::internal(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| HrError::internal(e.to_string()))?;
    Ok(())
}

/// Fails with [`HrError::Duplicate`] if `taken` is true.
fn ensure_unique(
    taken: bool,
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> HrResult<()> {
    if taken {
        Err(HrError::Duplicate {
            entity,
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Replaces the record with the same id, or fails with `NotFound`.
fn replace_by_id<T>(
    records: &mut [T],
    record: T,
    id_of: impl Fn(&T) -> uuid::Uuid,
    entity: &'static str,
) -> HrResult<T>
where
    T: Clone,
{
    let id = id_of(&record);
    let slot = records
        .iter_mut()
        .find(|r| id_of(r) == id)
        .ok_or_else(|| HrError::not_found(entity, id))?;
    *slot = record.clone();
    Ok(record)
}
