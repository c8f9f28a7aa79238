//! Role-based access policy.
//!
//! [`authorize`] answers "may this role do this at all". Row-level limits
//! (a department head sees only their department, an employee only
//! themselves) are expressed as a [`Scope`] the handlers apply to results.

use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{Employee, Role};

/// An action guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Create and remove login accounts.
    ManageUsers,
    /// Read departments and schedules.
    ReadOrganization,
    /// Create, update and delete departments and schedules.
    ManageOrganization,
    /// Maintain the salary grade table.
    ManageSalaryGrades,
    /// Read employee records (scoped).
    ReadEmployees,
    /// Create, update and deactivate employees.
    ManageEmployees,
    /// Fetch an employee's QR badge (scoped).
    IssueBadge,
    /// Clock in and out for oneself.
    ClockSelf,
    /// Clock on behalf of another employee.
    ClockOthers,
    /// Operate a QR scanning kiosk.
    ScanBadges,
    /// Read attendance records (scoped).
    ReadAttendance,
    /// Read holidays and benefits.
    ReadReferenceData,
    /// Maintain holidays, deduction types and benefits.
    ManageReferenceData,
    /// Read benefit enrollments (scoped).
    ReadEnrollments,
    /// Enroll and unenroll employees.
    ManageEnrollments,
    /// Create, process, close and read payroll periods.
    ManagePayroll,
    /// Read a payslip (scoped).
    ReadPayslip,
    /// View dashboard analytics (scoped).
    ViewDashboard,
}

impl Permission {
    /// Stable name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManageUsers => "users:manage",
            Permission::ReadOrganization => "organization:read",
            Permission::ManageOrganization => "organization:manage",
            Permission::ManageSalaryGrades => "salary_grades:manage",
            Permission::ReadEmployees => "employees:read",
            Permission::ManageEmployees => "employees:manage",
            Permission::IssueBadge => "employees:badge",
            Permission::ClockSelf => "attendance:clock",
            Permission::ClockOthers => "attendance:clock_others",
            Permission::ScanBadges => "attendance:scan",
            Permission::ReadAttendance => "attendance:read",
            Permission::ReadReferenceData => "reference:read",
            Permission::ManageReferenceData => "reference:manage",
            Permission::ReadEnrollments => "enrollments:read",
            Permission::ManageEnrollments => "enrollments:manage",
            Permission::ManagePayroll => "payroll:manage",
            Permission::ReadPayslip => "payroll:payslip",
            Permission::ViewDashboard => "dashboard:view",
        }
    }
}

/// Returns true if the role holds the permission.
///
/// # Example
///
/// ```
/// use hr_payroll::auth::{Permission, role_allows};
/// use hr_payroll::models::Role;
///
/// assert!(role_allows(Role::Admin, Permission::ManagePayroll));
/// assert!(role_allows(Role::DepartmentHead, Permission::ViewDashboard));
/// assert!(!role_allows(Role::Employee, Permission::ViewDashboard));
/// ```
pub fn role_allows(role: Role, permission: Permission) -> bool {
    use Permission::*;

    match role {
        Role::Admin => true,
        Role::DepartmentHead => matches!(
            permission,
            ReadOrganization
                | ReadEmployees
                | ClockSelf
                | ScanBadges
                | ReadAttendance
                | ReadReferenceData
                | ReadPayslip
                | ViewDashboard
        ),
        Role::Employee => matches!(
            permission,
            ReadEmployees
                | IssueBadge
                | ClockSelf
                | ReadAttendance
                | ReadReferenceData
                | ReadEnrollments
                | ReadPayslip
        ),
    }
}

/// Checks a role against a permission.
///
/// # Errors
///
/// Returns [`HrError::Forbidden`] naming the missing permission.
pub fn authorize(role: Role, permission: Permission) -> HrResult<()> {
    if role_allows(role, permission) {
        Ok(())
    } else {
        Err(HrError::Forbidden {
            permission: permission.as_str().to_string(),
        })
    }
}

/// The employees a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every employee.
    All,
    /// Employees of one department.
    Department(Uuid),
    /// A single employee.
    Employee(Uuid),
    /// No employee records (a head or employee account without a linked employee).
    Nothing,
}

impl Scope {
    /// Derives the scope from a role and the principal's own employee record.
    ///
    /// A department head with no department sees only themselves.
    pub fn for_principal(role: Role, own: Option<&Employee>) -> Self {
        match (role, own) {
            (Role::Admin, _) => Scope::All,
            (Role::DepartmentHead, Some(employee)) => match employee.department_id {
                Some(department_id) => Scope::Department(department_id),
                None => Scope::Employee(employee.id),
            },
            (Role::Employee, Some(employee)) => Scope::Employee(employee.id),
            (_, None) => Scope::Nothing,
        }
    }

    /// Returns true if the employee is visible in this scope.
    pub fn includes(&self, employee: &Employee) -> bool {
        match self {
            Scope::All => true,
            Scope::Department(department_id) => employee.department_id == Some(*department_id),
            Scope::Employee(employee_id) => employee.id == *employee_id,
            Scope::Nothing => false,
        }
    }
}
