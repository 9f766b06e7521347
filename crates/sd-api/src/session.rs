use uuid::Uuid;

use sd_common::access::{
    can_access_view, can_delete, can_edit, AppRole, DepartmentAccess, EditTable, ViewId,
};
use sd_common::db::{get_user_role, PgPool};

use crate::auth::AuthUser;
use crate::error::ApiError;

/// The resolved actor for one request: who they are and what the access
/// tables say they may do. Built once per handler call and passed explicitly;
/// there is no ambient current-user state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub role: Option<AppRole>,
    pub departments: DepartmentAccess,
}

impl Session {
    /// Load the session for the authenticated caller. Service credentials
    /// (api-key mode) act with admin capabilities; JWT users get whatever
    /// their `user_roles` row grants, which may be nothing.
    pub async fn load(pool: &PgPool, auth: &AuthUser) -> Result<Self, ApiError> {
        match auth {
            AuthUser::Service => Ok(Self {
                user_id: None,
                role: Some(AppRole::Admin),
                departments: DepartmentAccess::full(),
            }),
            AuthUser::User { user_id } => {
                let assignment = get_user_role(pool, *user_id).await?;
                Ok(match assignment {
                    Some(row) => Self {
                        user_id: Some(*user_id),
                        role: Some(row.role),
                        departments: DepartmentAccess::from_raw(
                            &row.department_access,
                            &row.department_edit_access,
                        ),
                    },
                    None => Self {
                        user_id: Some(*user_id),
                        role: None,
                        departments: DepartmentAccess::default(),
                    },
                })
            }
        }
    }

    pub fn require_view(&self, view: ViewId) -> Result<(), ApiError> {
        if can_access_view(self.role, view) {
            Ok(())
        } else {
            Err(ApiError::restricted())
        }
    }

    pub fn require_edit(&self, table: EditTable) -> Result<(), ApiError> {
        if can_edit(self.role, table) {
            Ok(())
        } else {
            Err(ApiError::restricted())
        }
    }

    pub fn require_delete(&self) -> Result<(), ApiError> {
        if can_delete(self.role) {
            Ok(())
        } else {
            Err(ApiError::restricted())
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Some(AppRole::Admin) {
            Ok(())
        } else {
            Err(ApiError::restricted())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<AppRole>) -> Session {
        Session {
            user_id: Some(Uuid::new_v4()),
            role,
            departments: DepartmentAccess::default(),
        }
    }

    #[test]
    fn viewer_reaches_the_dashboard_but_not_finance() {
        let s = session(Some(AppRole::Viewer));
        assert!(s.require_view(ViewId::Dashboard).is_ok());
        assert!(matches!(
            s.require_view(ViewId::Finance),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn roleless_users_still_see_the_dashboard_shell() {
        let s = session(None);
        assert!(s.require_view(ViewId::Dashboard).is_ok());
        assert!(s.require_view(ViewId::Clients).is_err());
        assert!(s.require_edit(EditTable::Clients).is_err());
    }

    #[test]
    fn delete_requires_admin() {
        assert!(session(Some(AppRole::Admin)).require_delete().is_ok());
        assert!(session(Some(AppRole::Finance)).require_delete().is_err());
    }
}
