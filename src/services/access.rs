//! Access guard: role checks against the current session.
//!
//! The guard never trusts a role carried by the request body; it only
//! reads the server-side [`SessionIdentity`] resolved by the session
//! middleware.

use crate::domain::{ReportScope, SessionIdentity, UserRole};
use crate::errors::{AppError, AppResult};

/// Admit `session` if it exists and, when `allowed` is non-empty, holds
/// one of the listed roles.
///
/// No session is `Unauthorized`; a session with the wrong role is
/// `Forbidden`. An empty `allowed` list admits any authenticated caller.
pub fn authorize<'a>(
    session: Option<&'a SessionIdentity>,
    allowed: &[UserRole],
) -> AppResult<&'a SessionIdentity> {
    let session = session.ok_or(AppError::Unauthorized)?;

    if !allowed.is_empty() && !allowed.contains(&session.role) {
        tracing::debug!(
            user_id = %session.user_id,
            role = %session.role,
            "Role not permitted for this route"
        );
        return Err(AppError::Forbidden);
    }

    Ok(session)
}

/// Reports the session may read
pub fn report_scope(session: &SessionIdentity) -> ReportScope {
    if session.role.is_staff() {
        ReportScope::All
    } else {
        ReportScope::Concerning(session.user_id)
    }
}
