//! Permission evaluation — the read path of the RBAC core.

use aula_core::error::{AulaError, AulaResult};
use aula_core::repository::{PermissionRepository, RoleRepository};
use tracing::debug;
use uuid::Uuid;

/// Evaluates authorization requests against role and permission grants.
///
/// Generic over repository implementations so the evaluator has no
/// dependency on the database crate. The evaluator is a pure read path:
/// it holds no mutable state and is safe for unbounded concurrent use.
///
/// The caller supplies the tenant context — the evaluator never infers
/// the tenant from the user, so a role held in another tenant can never
/// affect a decision.
pub struct AccessEvaluator<R: RoleRepository, P: PermissionRepository> {
    role_repo: R,
    permission_repo: P,
}

impl<R: RoleRepository, P: PermissionRepository> AccessEvaluator<R, P> {
    pub fn new(role_repo: R, permission_repo: P) -> Self {
        Self {
            role_repo,
            permission_repo,
        }
    }

    /// Decide whether `user_id` may perform `action` on `resource`
    /// within `tenant_id`.
    ///
    /// Returns `true` as soon as any role assigned to the user carries a
    /// permission whose (resource, action) pair matches the request
    /// exactly. A user with no roles, or no matching grant, is denied.
    /// Absence of data is a deny, not an error — `Err` is reserved for
    /// store failures.
    ///
    /// Role levels are informational only: a level-0 role with no
    /// matching grant is denied like any other.
    pub async fn authorize(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        resource: &str,
        action: &str,
    ) -> AulaResult<bool> {
        let roles = self.role_repo.get_user_roles(tenant_id, user_id).await?;

        for role in &roles {
            let permissions = self
                .permission_repo
                .get_role_permissions(tenant_id, role.id)
                .await?;

            if permissions
                .iter()
                .any(|p| p.resource == resource && p.action == action)
            {
                debug!(
                    %tenant_id, %user_id, resource, action,
                    role = %role.name,
                    "authorization granted"
                );
                return Ok(true);
            }
        }

        debug!(
            %tenant_id, %user_id, resource, action,
            roles = roles.len(),
            "authorization denied"
        );
        Ok(false)
    }

    /// Request-handler convenience: authorize or fail with
    /// [`AulaError::AccessDenied`] naming the (resource, action).
    pub async fn require(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        resource: &str,
        action: &str,
    ) -> AulaResult<()> {
        if self.authorize(tenant_id, user_id, resource, action).await? {
            Ok(())
        } else {
            Err(AulaError::AccessDenied {
                resource: resource.to_string(),
                action: action.to_string(),
            })
        }
    }
}
