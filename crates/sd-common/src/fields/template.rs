use crate::access::Department;
use crate::api::custom_fields::{CustomFieldType, CustomKpiField};
use crate::api::employees::EmployeeRef;
use crate::fields::import::ImportGrid;

/// A built-in KPI column every template for a department carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardKpi {
    pub name: &'static str,
    pub kpi_type: CustomFieldType,
}

const fn kpi(name: &'static str, kpi_type: CustomFieldType) -> StandardKpi {
    StandardKpi { name, kpi_type }
}

/// The built-in KPI catalog per department.
pub fn standard_kpis(department: Department) -> &'static [StandardKpi] {
    use CustomFieldType::*;

    const RECRUITER: &[StandardKpi] = &[
        kpi("Open Positions Worked On", Number),
        kpi("Job Coverage Ratio", Percentage),
        kpi("AM Submissions", Number),
        kpi("End Client Submissions", Number),
        kpi("Interviews", Number),
        kpi("Hired", Number),
    ];
    const ACCOUNT_MANAGER: &[StandardKpi] = &[
        kpi("Client Meetings", Number),
        kpi("Jobs Opened", Number),
        kpi("Revenue Generated", Currency),
    ];
    const BUSINESS_DEVELOPMENT: &[StandardKpi] = &[
        kpi("Leads Generated", Number),
        kpi("Meetings Scheduled", Number),
        kpi("Proposals Sent", Number),
        kpi("Deals Closed", Number),
    ];
    const OPERATIONS_MANAGER: &[StandardKpi] = &[
        kpi("Tasks Completed", Number),
        kpi("Process Improvements", Number),
    ];

    match department {
        Department::Recruiter => RECRUITER,
        Department::AccountManager => ACCOUNT_MANAGER,
        Department::BusinessDevelopment => BUSINESS_DEVELOPMENT,
        Department::OperationsManager => OPERATIONS_MANAGER,
        Department::Finance => &[],
    }
}

/// Build the import template for a department: headers (id, name, standard
/// KPIs, then custom fields in field order) plus one blank row per employee.
pub fn generate_template(
    department: Department,
    employees: &[EmployeeRef],
    custom_fields: &[CustomKpiField],
) -> ImportGrid {
    let mut headers = vec!["Employee ID".to_string(), "Employee Name".to_string()];
    headers.extend(standard_kpis(department).iter().map(|k| k.name.to_string()));

    let mut ordered: Vec<&CustomKpiField> = custom_fields.iter().collect();
    ordered.sort_by_key(|field| field.field_order);
    headers.extend(ordered.iter().map(|field| field.field_name.clone()));

    let blank_cols = headers.len() - 2;
    let rows = employees
        .iter()
        .map(|emp| {
            let mut cells = vec![emp.id.to_string(), emp.name.clone()];
            cells.extend(std::iter::repeat(String::new()).take(blank_cols));
            cells
        })
        .collect();

    ImportGrid { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn custom(name: &str, order: i32) -> CustomKpiField {
        CustomKpiField {
            id: Uuid::new_v4(),
            department: Department::Recruiter,
            field_name: name.into(),
            field_type: CustomFieldType::Number,
            field_order: order,
            is_active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn template_orders_headers_id_name_standard_then_custom() {
        let employees = vec![EmployeeRef {
            id: Uuid::new_v4(),
            name: "Priya".into(),
        }];
        let fields = vec![custom("Referrals", 2), custom("Callbacks", 1)];

        let grid = generate_template(Department::Recruiter, &employees, &fields);

        assert_eq!(grid.headers[0], "Employee ID");
        assert_eq!(grid.headers[1], "Employee Name");
        assert_eq!(grid.headers[2], "Open Positions Worked On");
        // Custom fields follow field_order, not input order.
        let tail = &grid.headers[grid.headers.len() - 2..];
        assert_eq!(tail, ["Callbacks", "Referrals"]);
    }

    #[test]
    fn template_rows_carry_identity_and_blank_cells() {
        let emp = EmployeeRef {
            id: Uuid::new_v4(),
            name: "Priya".into(),
        };
        let grid = generate_template(Department::OperationsManager, &[emp.clone()], &[]);

        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0].len(), grid.headers.len());
        assert_eq!(grid.rows[0][0], emp.id.to_string());
        assert_eq!(grid.rows[0][1], "Priya");
        assert!(grid.rows[0][2..].iter().all(String::is_empty));
    }

    #[test]
    fn every_department_has_a_catalog_entry() {
        // Finance simply has no built-in KPI columns.
        assert!(standard_kpis(Department::Finance).is_empty());
        assert_eq!(standard_kpis(Department::Recruiter).len(), 6);
        assert_eq!(standard_kpis(Department::AccountManager).len(), 3);
    }
}
