//! Departments, schedules and salary grades.

use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{Department, SalaryGrade, SalarySource, Schedule};

use super::{Store, StoreData, ensure_unique, replace_by_id};

fn check_department(data: &StoreData, department: &Department) -> HrResult<()> {
    ensure_unique(
        data.departments
            .iter()
            .any(|d| d.id != department.id && d.name.eq_ignore_ascii_case(&department.name)),
        "department",
        "name",
        &department.name,
    )?;
    if let Some(head_id) = department.head_employee_id
        && !data.employees.iter().any(|e| e.id == head_id)
    {
        return Err(HrError::validation(
            "head_employee_id",
            format!("employee {} does not exist", head_id),
        ));
    }
    Ok(())
}

fn check_schedule(data: &StoreData, schedule: &Schedule) -> HrResult<()> {
    ensure_unique(
        data.schedules
            .iter()
            .any(|s| s.id != schedule.id && s.name.eq_ignore_ascii_case(&schedule.name)),
        "schedule",
        "name",
        &schedule.name,
    )
}

fn grade_in_use(data: &StoreData, grade: u8) -> Option<u8> {
    data.employees
        .iter()
        .filter_map(|e| match e.salary {
            SalarySource::Grade { grade: g, step } if g == grade => Some(step),
            _ => None,
        })
        .max()
}

impl Store {
    /// Lists departments by name.
    pub fn list_departments(&self) -> Vec<Department> {
        self.read(|data| {
            let mut departments = data.departments.clone();
            departments.sort_by_key(|d| d.name.to_lowercase());
            departments
        })
    }

    /// Fetches a department.
    pub fn get_department(&self, id: Uuid) -> HrResult<Department> {
        self.read(|data| {
            data.departments
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| HrError::not_found("department", id))
        })
    }

    /// Adds a department with a unique name.
    pub fn create_department(&self, department: Department) -> HrResult<Department> {
        self.write(|data| {
            check_department(data, &department)?;
            data.departments.push(department.clone());
            Ok(department)
        })
    }

    /// Replaces a department.
    pub fn update_department(&self, department: Department) -> HrResult<Department> {
        self.write(|data| {
            check_department(data, &department)?;
            replace_by_id(&mut data.departments, department, |d| d.id, "department")
        })
    }

    /// Deletes a department no employee belongs to.
    pub fn delete_department(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if !data.departments.iter().any(|d| d.id == id) {
                return Err(HrError::not_found("department", id));
            }
            let members = data
                .employees
                .iter()
                .filter(|e| e.department_id == Some(id))
                .count();
            if members > 0 {
                return Err(HrError::conflict(format!(
                    "department still has {} employee(s)",
                    members
                )));
            }
            data.departments.retain(|d| d.id != id);
            Ok(())
        })
    }

    /// Lists schedules by name.
    pub fn list_schedules(&self) -> Vec<Schedule> {
        self.read(|data| {
            let mut schedules = data.schedules.clone();
            schedules.sort_by_key(|s| s.name.to_lowercase());
            schedules
        })
    }

    /// Fetches a schedule.
    pub fn get_schedule(&self, id: Uuid) -> HrResult<Schedule> {
        self.read(|data| {
            data.schedules
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| HrError::not_found("schedule", id))
        })
    }

    /// Adds a schedule with a unique name.
    pub fn create_schedule(&self, schedule: Schedule) -> HrResult<Schedule> {
        self.write(|data| {
            check_schedule(data, &schedule)?;
            data.schedules.push(schedule.clone());
            Ok(schedule)
        })
    }

    /// Replaces a schedule. Existing attendance keeps its computed minutes.
    pub fn update_schedule(&self, schedule: Schedule) -> HrResult<Schedule> {
        self.write(|data| {
            check_schedule(data, &schedule)?;
            replace_by_id(&mut data.schedules, schedule, |s| s.id, "schedule")
        })
    }

    /// Deletes a schedule no employee is assigned to.
    pub fn delete_schedule(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if !data.schedules.iter().any(|s| s.id == id) {
                return Err(HrError::not_found("schedule", id));
            }
            if data.employees.iter().any(|e| e.schedule_id == Some(id)) {
                return Err(HrError::conflict("schedule is assigned to employees"));
            }
            data.schedules.retain(|s| s.id != id);
            Ok(())
        })
    }

    /// Lists salary grades in grade order.
    pub fn list_salary_grades(&self) -> Vec<SalaryGrade> {
        self.read(|data| {
            let mut grades = data.salary_grades.clone();
            grades.sort_by_key(|g| g.grade);
            grades
        })
    }

    /// Fetches a salary grade by id.
    pub fn get_salary_grade(&self, id: Uuid) -> HrResult<SalaryGrade> {
        self.read(|data| {
            data.salary_grades
                .iter()
                .find(|g| g.id == id)
                .cloned()
                .ok_or_else(|| HrError::not_found("salary grade", id))
        })
    }

    /// Adds a salary grade with a unique grade number.
    pub fn create_salary_grade(&self, grade: SalaryGrade) -> HrResult<SalaryGrade> {
        self.write(|data| {
            ensure_unique(
                data.salary_grades.iter().any(|g| g.grade == grade.grade),
                "salary grade",
                "grade",
                &grade.grade.to_string(),
            )?;
            data.salary_grades.push(grade.clone());
            Ok(grade)
        })
    }

    /// Replaces a salary grade.
    ///
    /// A grade referenced by employees keeps its number and may not drop
    /// steps that are in use.
    pub fn update_salary_grade(&self, grade: SalaryGrade) -> HrResult<SalaryGrade> {
        self.write(|data| {
            let current = data
                .salary_grades
                .iter()
                .find(|g| g.id == grade.id)
                .ok_or_else(|| HrError::not_found("salary grade", grade.id))?;
            ensure_unique(
                data.salary_grades
                    .iter()
                    .any(|g| g.id != grade.id && g.grade == grade.grade),
                "salary grade",
                "grade",
                &grade.grade.to_string(),
            )?;

            if let Some(highest_step) = grade_in_use(data, current.grade) {
                if current.grade != grade.grade {
                    return Err(HrError::conflict(
                        "grade number cannot change while employees reference it",
                    ));
                }
                if usize::from(highest_step) > grade.steps.len() {
                    return Err(HrError::conflict(format!(
                        "step {} is still assigned to employees",
                        highest_step
                    )));
                }
            }

            replace_by_id(&mut data.salary_grades, grade, |g| g.id, "salary grade")
        })
    }

    /// Deletes a salary grade no employee references.
    pub fn delete_salary_grade(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            let grade = data
                .salary_grades
                .iter()
                .find(|g| g.id == id)
                .map(|g| g.grade)
                .ok_or_else(|| HrError::not_found("salary grade", id))?;
            if grade_in_use(data, grade).is_some() {
                return Err(HrError::conflict("salary grade is assigned to employees"));
            }
            data.salary_grades.retain(|g| g.id != id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{department, employee, schedule};
    use rust_decimal::Decimal;

    fn grade(number: u8, steps: usize) -> SalaryGrade {
        SalaryGrade {
            id: Uuid::new_v4(),
            grade: number,
            name: format!("SG-{}", number),
            steps: (0..steps)
                .map(|i| Decimal::new(20000 + 500 * i as i64, 0))
                .collect(),
        }
    }

    #[test]
    fn test_department_names_unique_ignoring_case() {
        let store = Store::in_memory();
        store.create_department(department("Finance")).unwrap();

        match store.create_department(department("FINANCE")) {
            Err(HrError::Duplicate { entity, field, .. }) => {
                assert_eq!(entity, "department");
                assert_eq!(field, "name");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_rename_to_own_name_allowed() {
        let store = Store::in_memory();
        let mut finance = store.create_department(department("Finance")).unwrap();
        finance.description = Some("Money".to_string());

        let updated = store.update_department(finance).unwrap();
        assert_eq!(updated.description.as_deref(), Some("Money"));
    }

    #[test]
    fn test_referenced_department_cannot_be_deleted() {
        let store = Store::in_memory();
        let finance = store.create_department(department("Finance")).unwrap();
        let mut emp = employee("EMP-1");
        emp.department_id = Some(finance.id);
        store.create_employee(emp).unwrap();

        assert!(matches!(
            store.delete_department(finance.id),
            Err(HrError::Conflict { .. })
        ));
    }

    #[test]
    fn test_unknown_department_head_rejected() {
        let store = Store::in_memory();
        let mut finance = department("Finance");
        finance.head_employee_id = Some(Uuid::new_v4());

        assert!(matches!(
            store.create_department(finance),
            Err(HrError::Validation { .. })
        ));
    }

    #[test]
    fn test_referenced_schedule_cannot_be_deleted() {
        let store = Store::in_memory();
        let day = store.create_schedule(schedule("Day")).unwrap();
        let mut emp = employee("EMP-1");
        emp.schedule_id = Some(day.id);
        store.create_employee(emp).unwrap();

        assert!(matches!(
            store.delete_schedule(day.id),
            Err(HrError::Conflict { .. })
        ));
    }

    #[test]
    fn test_salary_grade_rules() {
        let store = Store::in_memory();
        let sg = store.create_salary_grade(grade(11, 3)).unwrap();
        assert!(matches!(
            store.create_salary_grade(grade(11, 1)),
            Err(HrError::Duplicate { .. })
        ));

        let mut emp = employee("EMP-1");
        emp.salary = SalarySource::Grade { grade: 11, step: 3 };
        store.create_employee(emp).unwrap();

        let mut shrunk = sg.clone();
        shrunk.steps.truncate(2);
        assert!(matches!(
            store.update_salary_grade(shrunk),
            Err(HrError::Conflict { .. })
        ));

        let mut renumbered = sg.clone();
        renumbered.grade = 12;
        assert!(matches!(
            store.update_salary_grade(renumbered),
            Err(HrError::Conflict { .. })
        ));

        assert!(matches!(
            store.delete_salary_grade(sg.id),
            Err(HrError::Conflict { .. })
        ));
    }

    #[test]
    fn test_missing_records_not_found() {
        let store = Store::in_memory();
        assert!(matches!(
            store.get_department(Uuid::new_v4()),
            Err(HrError::NotFound { .. })
        ));
        assert!(matches!(
            store.update_schedule(schedule("Ghost")),
            Err(HrError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_salary_grade(Uuid::new_v4()),
            Err(HrError::NotFound { .. })
        ));
    }
}
