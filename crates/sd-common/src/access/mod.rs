//! Role-based view and edit resolution.
//!
//! Every check here is a lookup against a static table. Unknown view ids or
//! table names resolve to "denied", never to an error, so the API layer can
//! pass through untrusted identifiers without pre-validating them.

mod department;

pub use department::{Department, DepartmentAccess, ALL_DEPARTMENTS};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Account classification for dashboard users. Distinct from [`Department`],
/// which scopes data visibility inside a view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppRole {
    Admin,
    AccountManager,
    Recruiter,
    BusinessDev,
    Operations,
    Finance,
    Viewer,
}

/// Navigable view identifiers, kebab-cased on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ViewId {
    Dashboard,
    Clients,
    Jobs,
    Recruiters,
    AccountManagers,
    BusinessDev,
    Operations,
    Finance,
    Performance,
    Admin,
}

/// Tables whose mutation is gated per role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditTable {
    Employees,
    Clients,
    Jobs,
    JobRecruiters,
    RecruiterActivities,
    AmActivities,
    BdProspects,
    Invoices,
    Payments,
    EmployeeScores,
    KpiTargets,
    CustomKpiFields,
    CustomKpiValues,
    UserRoles,
}

use AppRole::*;

/// Roles allowed to open a view. Admin is handled before the lookup, so the
/// table only lists non-admin access.
fn view_roles(view: ViewId) -> &'static [AppRole] {
    match view {
        // Dashboard is open to every role; the no-role case is handled in
        // `can_access_view` (role-less users still get the dashboard shell).
        ViewId::Dashboard => &[
            AccountManager,
            Recruiter,
            BusinessDev,
            Operations,
            Finance,
            Viewer,
        ],
        ViewId::Clients => &[AccountManager, Finance],
        ViewId::Jobs => &[AccountManager, Recruiter],
        ViewId::Recruiters => &[Recruiter, Operations],
        ViewId::AccountManagers => &[AccountManager, Operations],
        ViewId::BusinessDev => &[BusinessDev],
        ViewId::Operations => &[Operations],
        ViewId::Finance => &[Finance],
        ViewId::Performance => &[Operations],
        ViewId::Admin => &[],
    }
}

fn edit_roles(table: EditTable) -> &'static [AppRole] {
    match table {
        EditTable::Employees => &[],
        EditTable::Clients => &[AccountManager],
        EditTable::Jobs => &[AccountManager],
        EditTable::JobRecruiters => &[AccountManager],
        EditTable::RecruiterActivities => &[Recruiter],
        EditTable::AmActivities => &[AccountManager],
        EditTable::BdProspects => &[BusinessDev],
        EditTable::Invoices => &[Finance],
        EditTable::Payments => &[Finance],
        EditTable::EmployeeScores => &[Operations],
        EditTable::KpiTargets => &[],
        EditTable::CustomKpiFields => &[],
        EditTable::CustomKpiValues => &[],
        EditTable::UserRoles => &[],
    }
}

/// Whether `role` may open `view`. Admin passes everything; the dashboard is
/// visible to everyone, including users with no role row at all.
pub fn can_access_view(role: Option<AppRole>, view: ViewId) -> bool {
    if view == ViewId::Dashboard {
        return true;
    }
    match role {
        Some(Admin) => true,
        Some(role) => view_roles(view).contains(&role),
        None => false,
    }
}

/// Whether `role` may mutate rows of `table`. Admin passes everything.
pub fn can_edit(role: Option<AppRole>, table: EditTable) -> bool {
    match role {
        Some(Admin) => true,
        Some(role) => edit_roles(table).contains(&role),
        None => false,
    }
}

/// Deletion is an admin-only capability, with no table-level granularity.
pub fn can_delete(role: Option<AppRole>) -> bool {
    role == Some(Admin)
}

/// String-level mirror of [`can_access_view`]; unknown view ids are denied.
pub fn can_access_view_id(role: Option<AppRole>, view_id: &str) -> bool {
    match ViewId::from_str(view_id) {
        Ok(view) => can_access_view(role, view),
        Err(_) => false,
    }
}

/// String-level mirror of [`can_edit`]; unknown table names are denied.
pub fn can_edit_table(role: Option<AppRole>, table_name: &str) -> bool {
    match EditTable::from_str(table_name) {
        Ok(table) => can_edit(role, table),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VIEWS: [ViewId; 10] = [
        ViewId::Dashboard,
        ViewId::Clients,
        ViewId::Jobs,
        ViewId::Recruiters,
        ViewId::AccountManagers,
        ViewId::BusinessDev,
        ViewId::Operations,
        ViewId::Finance,
        ViewId::Performance,
        ViewId::Admin,
    ];

    #[test]
    fn admin_passes_every_view() {
        for view in ALL_VIEWS {
            assert!(can_access_view(Some(AppRole::Admin), view), "{view}");
        }
    }

    #[test]
    fn dashboard_is_open_to_everyone_including_no_role() {
        assert!(can_access_view(None, ViewId::Dashboard));
        assert!(can_access_view(Some(AppRole::Viewer), ViewId::Dashboard));
    }

    #[test]
    fn viewer_sees_only_the_dashboard() {
        for view in ALL_VIEWS {
            let expected = view == ViewId::Dashboard;
            assert_eq!(can_access_view(Some(AppRole::Viewer), view), expected, "{view}");
        }
    }

    #[test]
    fn no_role_is_denied_everywhere_but_the_dashboard() {
        for view in ALL_VIEWS {
            let expected = view == ViewId::Dashboard;
            assert_eq!(can_access_view(None, view), expected, "{view}");
        }
    }

    #[test]
    fn finance_can_open_finance_but_not_jobs() {
        assert!(can_access_view(Some(AppRole::Finance), ViewId::Finance));
        assert!(!can_access_view(Some(AppRole::Finance), ViewId::Jobs));
    }

    #[test]
    fn edit_grants_follow_the_static_table() {
        assert!(can_edit(Some(AppRole::Finance), EditTable::Invoices));
        assert!(can_edit(Some(AppRole::Recruiter), EditTable::RecruiterActivities));
        assert!(!can_edit(Some(AppRole::Recruiter), EditTable::Invoices));
        assert!(!can_edit(Some(AppRole::Viewer), EditTable::Clients));
        assert!(!can_edit(None, EditTable::Clients));
    }

    #[test]
    fn only_admin_edits_admin_tables() {
        for table in [
            EditTable::Employees,
            EditTable::KpiTargets,
            EditTable::CustomKpiFields,
            EditTable::CustomKpiValues,
            EditTable::UserRoles,
        ] {
            assert!(can_edit(Some(AppRole::Admin), table));
            assert!(!can_edit(Some(AppRole::Operations), table), "{table}");
        }
    }

    #[test]
    fn delete_is_admin_only() {
        assert!(can_delete(Some(AppRole::Admin)));
        assert!(!can_delete(Some(AppRole::Finance)));
        assert!(!can_delete(None));
    }

    #[test]
    fn unknown_identifiers_are_denied_not_errors() {
        assert!(!can_access_view_id(Some(AppRole::Admin), "not-a-view"));
        assert!(!can_access_view_id(Some(AppRole::Viewer), "payroll"));
        assert!(!can_edit_table(Some(AppRole::Finance), "ledger_entries"));
    }

    #[test]
    fn wire_forms_round_trip() {
        assert_eq!(AppRole::AccountManager.as_ref(), "account_manager");
        assert_eq!(
            "business-dev".parse::<ViewId>().unwrap(),
            ViewId::BusinessDev
        );
        assert_eq!(
            "recruiter_activities".parse::<EditTable>().unwrap(),
            EditTable::RecruiterActivities
        );
    }
}
