//! Request-scoped subject resolution and access guards

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use crm_core::{AccessContext, Action};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller's access context, resolved once per request from
/// the bearer token.
pub struct CurrentSubject(pub AccessContext);

impl FromRequestParts<AppState> for CurrentSubject {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let user_id = state.jwt.validate_access_token(token)?;
        let context = state.sessions.resolve(&user_id).await?;
        Ok(CurrentSubject(context))
    }
}

/// Rejects the request unless the subject may perform `action` on `module_key`.
///
/// The denial reason is logged but never returned to the client.
pub fn require_access(context: &AccessContext, module_key: &str, action: Action) -> Result<(), ApiError> {
    let decision = context.evaluate(Some(module_key), Some(action));
    if decision.is_allowed() {
        debug!(
            "User {} allowed {} on {}",
            context.user_id,
            action.as_str(),
            module_key
        );
        return Ok(());
    }

    warn!(
        "User {} denied {} on {} ({})",
        context.user_id,
        action.as_str(),
        module_key,
        decision.as_str()
    );
    Err(ApiError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::GranularPermission;

    #[test]
    fn test_require_access() {
        let mut context = AccessContext {
            enabled_modules: vec!["grupos".to_string()],
            ..Default::default()
        };
        context.group_permissions.insert("grupos", GranularPermission::read_only());

        assert!(require_access(&context, "grupos", Action::View).is_ok());
        assert!(matches!(
            require_access(&context, "grupos", Action::Edit),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            require_access(&context, "franquias", Action::View),
            Err(ApiError::Forbidden)
        ));
    }
}
