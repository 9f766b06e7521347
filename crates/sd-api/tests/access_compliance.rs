use sd_common::access::{
    can_access_view, can_delete, can_edit, AppRole, DepartmentAccess, EditTable, ViewId,
    ALL_DEPARTMENTS,
};

const ALL_ROLES: [AppRole; 7] = [
    AppRole::Admin,
    AppRole::AccountManager,
    AppRole::Recruiter,
    AppRole::BusinessDev,
    AppRole::Operations,
    AppRole::Finance,
    AppRole::Viewer,
];

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

const ALL_TABLES: [EditTable; 14] = [
    EditTable::Employees,
    EditTable::Clients,
    EditTable::Jobs,
    EditTable::JobRecruiters,
    EditTable::RecruiterActivities,
    EditTable::AmActivities,
    EditTable::BdProspects,
    EditTable::Invoices,
    EditTable::Payments,
    EditTable::EmployeeScores,
    EditTable::KpiTargets,
    EditTable::CustomKpiFields,
    EditTable::CustomKpiValues,
    EditTable::UserRoles,
];

#[test]
fn admin_is_monotonic_over_every_view_and_table() {
    for view in ALL_VIEWS {
        assert!(can_access_view(Some(AppRole::Admin), view));
    }
    for table in ALL_TABLES {
        assert!(can_edit(Some(AppRole::Admin), table));
    }
    assert!(can_delete(Some(AppRole::Admin)));
}

#[test]
fn every_role_reaches_the_dashboard() {
    for role in ALL_ROLES {
        assert!(can_access_view(Some(role), ViewId::Dashboard), "{role}");
    }
    assert!(can_access_view(None, ViewId::Dashboard));
}

#[test]
fn non_admin_roles_never_edit_admin_only_tables() {
    let admin_only = [
        EditTable::Employees,
        EditTable::KpiTargets,
        EditTable::CustomKpiFields,
        EditTable::CustomKpiValues,
        EditTable::UserRoles,
    ];

    for role in ALL_ROLES.into_iter().filter(|role| *role != AppRole::Admin) {
        for table in admin_only {
            assert!(!can_edit(Some(role), table), "{role} should not edit {table}");
        }
        assert!(!can_delete(Some(role)), "{role} should not delete");
    }
}

#[test]
fn viewer_is_read_only_everywhere() {
    for table in ALL_TABLES {
        assert!(!can_edit(Some(AppRole::Viewer), table), "{table}");
    }
}

// Exhaustive randomized-ish toggle walk: whatever order view/edit flags are
// flipped in, edit access never escapes view access.
#[test]
fn department_toggle_sequences_preserve_the_subset_invariant() {
    let mut access = DepartmentAccess::default();

    for round in 0..6usize {
        for (idx, dept) in ALL_DEPARTMENTS.into_iter().enumerate() {
            if (round + idx) % 3 == 0 {
                access.toggle_edit(dept);
            } else if (round + idx) % 3 == 1 {
                access.toggle_view(dept);
            } else {
                access.toggle_edit(dept);
                access.toggle_view(dept);
            }
            assert!(
                access.invariant_holds(),
                "edit ⊆ view violated after round {round} on {dept:?}"
            );
        }

        if round % 2 == 0 {
            access.set_all_edit(true);
        } else {
            access.set_all_view(false);
        }
        assert!(access.invariant_holds(), "after bulk toggle in round {round}");
    }
}
