use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Functional business unit used for per-user access lists and for scoping
/// custom KPI fields. Wire strings are the display-cased names the store
/// keeps in its `text[]` columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
pub enum Department {
    #[serde(rename = "Recruiter")]
    #[strum(serialize = "Recruiter")]
    Recruiter,
    #[serde(rename = "Account Manager")]
    #[strum(serialize = "Account Manager")]
    AccountManager,
    #[serde(rename = "Business Development")]
    #[strum(serialize = "Business Development")]
    BusinessDevelopment,
    #[serde(rename = "Operations Manager")]
    #[strum(serialize = "Operations Manager")]
    OperationsManager,
    #[serde(rename = "Finance")]
    #[strum(serialize = "Finance")]
    Finance,
}

pub const ALL_DEPARTMENTS: [Department; 5] = [
    Department::Recruiter,
    Department::AccountManager,
    Department::BusinessDevelopment,
    Department::OperationsManager,
    Department::Finance,
];

/// A user's per-department view/edit flags.
///
/// Invariant: `edit` is always a subset of `view` — editing a department
/// implies viewing it. Every mutation path re-establishes the invariant, so
/// arbitrary toggle sequences cannot break it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAccess {
    pub view: BTreeSet<Department>,
    pub edit: BTreeSet<Department>,
}

impl DepartmentAccess {
    /// Build from the raw string lists as stored. Unknown department names
    /// are dropped, and any edit entry without a matching view entry gains
    /// one.
    pub fn from_raw(view: &[String], edit: &[String]) -> Self {
        let parse = |names: &[String]| {
            names
                .iter()
                .filter_map(|name| Department::from_str(name).ok())
                .collect::<BTreeSet<_>>()
        };

        let mut access = Self {
            view: parse(view),
            edit: parse(edit),
        };
        for dept in access.edit.clone() {
            access.view.insert(dept);
        }
        access
    }

    pub fn view_names(&self) -> Vec<String> {
        self.view.iter().map(|d| d.to_string()).collect()
    }

    pub fn edit_names(&self) -> Vec<String> {
        self.edit.iter().map(|d| d.to_string()).collect()
    }

    pub fn can_view(&self, dept: Department) -> bool {
        self.view.contains(&dept)
    }

    pub fn can_edit(&self, dept: Department) -> bool {
        self.edit.contains(&dept)
    }

    /// Flip a department's view flag. Turning view off also clears edit.
    pub fn toggle_view(&mut self, dept: Department) {
        if self.view.remove(&dept) {
            self.edit.remove(&dept);
        } else {
            self.view.insert(dept);
        }
    }

    /// Flip a department's edit flag. Turning edit on also turns view on.
    pub fn toggle_edit(&mut self, dept: Department) {
        if !self.edit.remove(&dept) {
            self.edit.insert(dept);
            self.view.insert(dept);
        }
    }

    /// Set the view flag for every department. Clearing all views clears all
    /// edits with them.
    pub fn set_all_view(&mut self, enabled: bool) {
        if enabled {
            self.view.extend(ALL_DEPARTMENTS);
        } else {
            self.view.clear();
            self.edit.clear();
        }
    }

    /// Set the edit flag for every department. Enabling all edits enables all
    /// views with them.
    pub fn set_all_edit(&mut self, enabled: bool) {
        if enabled {
            self.edit.extend(ALL_DEPARTMENTS);
            self.view.extend(ALL_DEPARTMENTS);
        } else {
            self.edit.clear();
        }
    }

    /// Grant everything. Used when a user is promoted to admin.
    pub fn full() -> Self {
        Self {
            view: ALL_DEPARTMENTS.into_iter().collect(),
            edit: ALL_DEPARTMENTS.into_iter().collect(),
        }
    }

    pub fn invariant_holds(&self) -> bool {
        self.edit.is_subset(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_toggle_implies_view() {
        let mut access = DepartmentAccess::default();
        access.toggle_edit(Department::Finance);

        assert!(access.can_view(Department::Finance));
        assert!(access.can_edit(Department::Finance));
        assert!(access.invariant_holds());
    }

    #[test]
    fn view_off_clears_edit() {
        let mut access = DepartmentAccess::default();
        access.toggle_edit(Department::Recruiter);
        access.toggle_view(Department::Recruiter);

        assert!(!access.can_view(Department::Recruiter));
        assert!(!access.can_edit(Department::Recruiter));
        assert!(access.invariant_holds());
    }

    #[test]
    fn toggle_all_preserves_the_implication() {
        let mut access = DepartmentAccess::default();
        access.set_all_edit(true);
        assert_eq!(access.view.len(), ALL_DEPARTMENTS.len());
        assert!(access.invariant_holds());

        access.set_all_view(false);
        assert!(access.view.is_empty());
        assert!(access.edit.is_empty());
        assert!(access.invariant_holds());
    }

    #[test]
    fn invariant_survives_arbitrary_toggle_sequences() {
        let mut access = DepartmentAccess::default();
        let sequence = [
            (0usize, true),
            (1, false),
            (2, true),
            (0, false),
            (4, true),
            (4, true),
            (3, false),
            (2, false),
        ];

        for (idx, edit) in sequence {
            let dept = ALL_DEPARTMENTS[idx];
            if edit {
                access.toggle_edit(dept);
            } else {
                access.toggle_view(dept);
            }
            assert!(access.invariant_holds(), "after toggling {dept:?}");
        }
    }

    #[test]
    fn from_raw_drops_unknown_names_and_repairs_the_subset() {
        let view = vec!["Finance".to_string(), "Payroll".to_string()];
        let edit = vec!["Recruiter".to_string()];

        let access = DepartmentAccess::from_raw(&view, &edit);

        assert!(access.can_view(Department::Finance));
        assert!(access.can_view(Department::Recruiter));
        assert!(access.can_edit(Department::Recruiter));
        assert_eq!(access.view.len(), 2);
        assert!(access.invariant_holds());
    }

    #[test]
    fn full_access_grants_every_department() {
        let access = DepartmentAccess::full();
        for dept in ALL_DEPARTMENTS {
            assert!(access.can_view(dept));
            assert!(access.can_edit(dept));
        }
    }
}
