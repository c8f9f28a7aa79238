//! Deduction types, benefits and benefit enrollments.

use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{Benefit, BenefitEnrollment, DeductionType};

use super::{Store, ensure_unique, replace_by_id};

impl Store {
    /// Lists deduction types by name.
    pub fn list_deduction_types(&self) -> Vec<DeductionType> {
        self.read(|data| {
            let mut types = data.deduction_types.clone();
            types.sort_by_key(|d| d.name.to_lowercase());
            types
        })
    }

    /// Adds a deduction type with a unique name.
    pub fn create_deduction_type(&self, deduction: DeductionType) -> HrResult<DeductionType> {
        self.write(|data| {
            ensure_unique(
                data.deduction_types
                    .iter()
                    .any(|d| d.name.eq_ignore_ascii_case(&deduction.name)),
                "deduction type",
                "name",
                &deduction.name,
            )?;
            data.deduction_types.push(deduction.clone());
            Ok(deduction)
        })
    }

    /// Replaces a deduction type. Processed payroll items are not recomputed.
    pub fn update_deduction_type(&self, deduction: DeductionType) -> HrResult<DeductionType> {
        self.write(|data| {
            ensure_unique(
                data.deduction_types
                    .iter()
                    .any(|d| d.id != deduction.id && d.name.eq_ignore_ascii_case(&deduction.name)),
                "deduction type",
                "name",
                &deduction.name,
            )?;
            replace_by_id(&mut data.deduction_types, deduction, |d| d.id, "deduction type")
        })
    }

    /// Deletes a deduction type.
    pub fn delete_deduction_type(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if !data.deduction_types.iter().any(|d| d.id == id) {
                return Err(HrError::not_found("deduction type", id));
            }
            data.deduction_types.retain(|d| d.id != id);
            Ok(())
        })
    }

    /// Lists benefits by name.
    pub fn list_benefits(&self) -> Vec<Benefit> {
        self.read(|data| {
            let mut benefits = data.benefits.clone();
            benefits.sort_by_key(|b| b.name.to_lowercase());
            benefits
        })
    }

    /// Adds a benefit with a unique name.
    pub fn create_benefit(&self, benefit: Benefit) -> HrResult<Benefit> {
        self.write(|data| {
            ensure_unique(
                data.benefits
                    .iter()
                    .any(|b| b.name.eq_ignore_ascii_case(&benefit.name)),
                "benefit",
                "name",
                &benefit.name,
            )?;
            data.benefits.push(benefit.clone());
            Ok(benefit)
        })
    }

    /// Replaces a benefit.
    pub fn update_benefit(&self, benefit: Benefit) -> HrResult<Benefit> {
        self.write(|data| {
            ensure_unique(
                data.benefits
                    .iter()
                    .any(|b| b.id != benefit.id && b.name.eq_ignore_ascii_case(&benefit.name)),
                "benefit",
                "name",
                &benefit.name,
            )?;
            replace_by_id(&mut data.benefits, benefit, |b| b.id, "benefit")
        })
    }

    /// Deletes a benefit nobody is enrolled in.
    pub fn delete_benefit(&self, id: Uuid) -> HrResult<()> {
        self.write(|data| {
            if !data.benefits.iter().any(|b| b.id == id) {
                return Err(HrError::not_found("benefit", id));
            }
            let enrolled = data.enrollments.iter().filter(|e| e.benefit_id == id).count();
            if enrolled > 0 {
                return Err(HrError::conflict(format!(
                    "benefit has {} enrollment(s); deactivate it instead",
                    enrolled
                )));
            }
            data.benefits.retain(|b| b.id != id);
            Ok(())
        })
    }

    /// Lists an employee's enrollments with their benefits.
    pub fn list_enrollments(&self, employee_id: Uuid) -> HrResult<Vec<(BenefitEnrollment, Benefit)>> {
        self.read(|data| {
            if !data.employees.iter().any(|e| e.id == employee_id) {
                return Err(HrError::not_found("employee", employee_id));
            }
            let mut enrolled: Vec<(BenefitEnrollment, Benefit)> = data
                .enrollments
                .iter()
                .filter(|e| e.employee_id == employee_id)
                .filter_map(|e| {
                    data.benefits
                        .iter()
                        .find(|b| b.id == e.benefit_id)
                        .map(|b| (e.clone(), b.clone()))
                })
                .collect();
            enrolled.sort_by_key(|(_, b)| b.name.to_lowercase());
            Ok(enrolled)
        })
    }

    /// Enrolls an employee in an active benefit, at most once per benefit.
    pub fn enroll(&self, enrollment: BenefitEnrollment) -> HrResult<BenefitEnrollment> {
        self.write(|data| {
            if !data.employees.iter().any(|e| e.id == enrollment.employee_id) {
                return Err(HrError::not_found("employee", enrollment.employee_id));
            }
            let benefit = data
                .benefits
                .iter()
                .find(|b| b.id == enrollment.benefit_id)
                .ok_or_else(|| HrError::not_found("benefit", enrollment.benefit_id))?;
            if !benefit.active {
                return Err(HrError::validation("benefit_id", "benefit is inactive"));
            }
            ensure_unique(
                data.enrollments.iter().any(|e| {
                    e.employee_id == enrollment.employee_id && e.benefit_id == enrollment.benefit_id
                }),
                "enrollment",
                "benefit_id",
                &enrollment.benefit_id.to_string(),
            )?;
            data.enrollments.push(enrollment.clone());
            Ok(enrollment)
        })
    }

    /// Removes an employee's enrollment in a benefit.
    pub fn unenroll(&self, employee_id: Uuid, benefit_id: Uuid) -> HrResult<()> {
        self.write(|data| {
            let before = data.enrollments.len();
            data.enrollments
                .retain(|e| !(e.employee_id == employee_id && e.benefit_id == benefit_id));
            if data.enrollments.len() == before {
                return Err(HrError::not_found("enrollment", benefit_id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BenefitKind, DeductionMethod};
    use crate::store::test_support::employee;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn benefit(name: &str, active: bool) -> Benefit {
        Benefit {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            kind: BenefitKind::Allowance,
            amount: Decimal::new(1500, 0),
            taxable: false,
            active,
        }
    }

    fn enrollment(employee_id: Uuid, benefit_id: Uuid) -> BenefitEnrollment {
        BenefitEnrollment {
            id: Uuid::new_v4(),
            employee_id,
            benefit_id,
            enrolled_on: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            amount_override: None,
        }
    }

    #[test]
    fn test_enroll_once_per_benefit() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();
        let rice = store.create_benefit(benefit("Rice", true)).unwrap();

        store.enroll(enrollment(emp.id, rice.id)).unwrap();
        assert!(matches!(
            store.enroll(enrollment(emp.id, rice.id)),
            Err(HrError::Duplicate { .. })
        ));

        let listed = store.list_enrollments(emp.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1.name, "Rice");
    }

    #[test]
    fn test_inactive_benefit_cannot_be_enrolled() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();
        let retired = store.create_benefit(benefit("Retired", false)).unwrap();

        assert!(matches!(
            store.enroll(enrollment(emp.id, retired.id)),
            Err(HrError::Validation { .. })
        ));
    }

    #[test]
    fn test_enrolled_benefit_cannot_be_deleted() {
        let store = Store::in_memory();
        let emp = store.create_employee(employee("EMP-1")).unwrap();
        let rice = store.create_benefit(benefit("Rice", true)).unwrap();
        store.enroll(enrollment(emp.id, rice.id)).unwrap();

        assert!(matches!(
            store.delete_benefit(rice.id),
            Err(HrError::Conflict { .. })
        ));

        store.unenroll(emp.id, rice.id).unwrap();
        store.delete_benefit(rice.id).unwrap();
        assert!(matches!(
            store.unenroll(emp.id, rice.id),
            Err(HrError::NotFound { .. })
        ));
    }

    #[test]
    fn test_deduction_type_names_unique() {
        let store = Store::in_memory();
        let deduction = |name: &str| DeductionType {
            id: Uuid::new_v4(),
            name: name.to_string(),
            method: DeductionMethod::Fixed {
                amount: Decimal::new(100, 0),
            },
            active: true,
        };
        let locker = store.create_deduction_type(deduction("Locker")).unwrap();
        let union = store.create_deduction_type(deduction("Union")).unwrap();

        let mut renamed = union.clone();
        renamed.name = "LOCKER".to_string();
        assert!(matches!(
            store.update_deduction_type(renamed),
            Err(HrError::Duplicate { .. })
        ));

        store.delete_deduction_type(locker.id).unwrap();
        assert_eq!(store.list_deduction_types(), vec![union]);
    }
}
