//! Employees and login accounts.

use uuid::Uuid;

use crate::calculation::monthly_rate;
use crate::error::{HrError, HrResult};
use crate::models::{Employee, Role, User};

use super::{Store, StoreData, ensure_unique, replace_by_id};

fn check_employee(data: &StoreData, employee: &Employee) -> HrResult<()> {
    ensure_unique(
        data.employees
            .iter()
            .any(|e| e.id != employee.id && e.employee_no.eq_ignore_ascii_case(&employee.employee_no)),
        "employee",
        "employee_no",
        &employee.employee_no,
    )?;
    ensure_unique(
        data.employees
            .iter()
            .any(|e| e.id != employee.id && e.email.eq_ignore_ascii_case(&employee.email)),
        "employee",
        "email",
        &employee.email,
    )?;

    if let Some(department_id) = employee.department_id
        && !data.departments.iter().any(|d| d.id == department_id)
    {
        return Err(HrError::validation(
            "department_id",
            format!("department {} does not exist", department_id),
        ));
    }
    if let Some(schedule_id) = employee.schedule_id
        && !data.schedules.iter().any(|s| s.id == schedule_id)
    {
        return Err(HrError::validation(
            "schedule_id",
            format!("schedule {} does not exist", schedule_id),
        ));
    }

    match monthly_rate(employee, &data.salary_grades) {
        Ok(_) => Ok(()),
        Err(HrError::NotFound { id, .. }) => Err(HrError::validation(
            "salary.grade",
            format!("salary grade {} does not exist", id),
        )),
        Err(e) => Err(e),
    }
}

/// Filters for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Only employees of this department.
    pub department_id: Option<Uuid>,
    /// Include deactivated employees.
    pub include_inactive: bool,
}

impl Store {
    /// Lists employees ordered by employee number.
    pub fn list_employees(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        self.read(|data| {
            let mut employees: Vec<Employee> = data
                .employees
                .iter()
                .filter(|e| filter.include_inactive || e.active)
                .filter(|e| filter.department_id.is_none() || e.department_id == filter.department_id)
                .cloned()
                .collect();
            employees.sort_by(|a, b| a.employee_no.cmp(&b.employee_no));
            employees
        })
    }

    /// Fetches an employee, active or not.
    pub fn get_employee(&self, id: Uuid) -> HrResult<Employee> {
        self.read(|data| {
            data.employees
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or_else(|| HrError::not_found("employee", id))
        })
    }

    /// Adds an employee.
    ///
    /// # Errors
    ///
    /// [`HrError::Duplicate`] on employee number or email,
    /// [`HrError::Validation`] when a referenced department, schedule or
    /// salary grade step does not exist.
    pub fn create_employee(&self, employee: Employee) -> HrResult<Employee> {
        self.write(|data| {
            check_employee(data, &employee)?;
            data.employees.push(employee.clone());
            Ok(employee)
        })
    }

    /// Replaces an employee record.
    ///
    /// Linked login accounts follow the employee's `active` flag, so a
    /// reactivated employee can sign in again.
    pub fn update_employee(&self, employee: Employee) -> HrResult<Employee> {
        self.write(|data| {
            check_employee(data, &employee)?;
            let employee = replace_by_id(&mut data.employees, employee, |e| e.id, "employee")?;
            for user in data
                .users
                .iter_mut()
                .filter(|u| u.employee_id == Some(employee.id))
            {
                user.active = employee.active;
            }
            Ok(employee)
        })
    }

    /// Deactivates an employee and their login account.
    ///
    /// Records are kept so attendance and payslips stay resolvable.
    pub fn deactivate_employee(&self, id: Uuid) -> HrResult<Employee> {
        self.write(|data| {
            let employee = data
                .employees
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| HrError::not_found("employee", id))?;
            employee.active = false;
            let employee = employee.clone();

            for user in data.users.iter_mut().filter(|u| u.employee_id == Some(id)) {
                user.active = false;
            }
            Ok(employee)
        })
    }

    /// Lists login accounts by email.
    pub fn list_users(&self) -> Vec<User> {
        self.read(|data| {
            let mut users = data.users.clone();
            users.sort_by_key(|u| u.email.to_lowercase());
            users
        })
    }

    /// Fetches a login account.
    pub fn get_user(&self, id: Uuid) -> HrResult<User> {
        self.read(|data| {
            data.users
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or_else(|| HrError::not_found("user", id))
        })
    }

    /// Finds a login account by email, ignoring case.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.read(|data| {
            data.users
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned()
        })
    }

    /// Adds a login account.
    ///
    /// Non-admin accounts must link an existing employee, and an employee has
    /// at most one account.
    pub fn create_user(&self, user: User) -> HrResult<User> {
        self.write(|data| {
            ensure_unique(
                data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)),
                "user",
                "email",
                &user.email,
            )?;

            match user.employee_id {
                Some(employee_id) => {
                    if !data.employees.iter().any(|e| e.id == employee_id) {
                        return Err(HrError::validation(
                            "employee_id",
                            format!("employee {} does not exist", employee_id),
                        ));
                    }
                    ensure_unique(
                        data.users.iter().any(|u| u.employee_id == Some(employee_id)),
                        "user",
                        "employee_id",
                        &employee_id.to_string(),
                    )?;
                }
                None if user.role != Role::Admin => {
                    return Err(HrError::validation(
                        "employee_id",
                        format!("required for role {}", user.role),
                    ));
                }
                None => {}
            }

            data.users.push(user.clone());
            Ok(user)
        })
    }

    /// Deletes a login account, keeping at least one active admin.
    pub fn delete_user(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            let user = data
                .users
                .iter()
                .find(|u| u.id == id)
                .ok_or_else(|| HrError::not_found("user", id))?;

            let other_admins = data
                .users
                .iter()
                .filter(|u| u.id != id && u.active && u.role == Role::Admin)
                .count();
            if user.role == Role::Admin && other_admins == 0 {
                return Err(HrError::conflict("cannot delete the last active admin"));
            }

            data.users.retain(|u| u.id != id);
            Ok(())
        })
    }

    /// Creates the first admin account when the store has no users.
    ///
    /// Returns true if an account was created.
    pub fn seed_admin(&self, email: &str, password_hash: &str) -> HrResult<bool> {
        self.write(|data| {
            if !data.users.is_empty() {
                return Ok(false);
            }
            data.users.push(User {
                id: Uuid::new_v4(),
                email: email.to_lowercase(),
                password_hash: password_hash.to_string(),
                role: Role::Admin,
                employee_id: None,
                active: true,
            });
            Ok(true)
        })
    }
}
