use axum::{
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};
use tracing::debug;

use shared_models::auth::{Principal, Role};
use shared_models::clinic::DoctorId;
use shared_models::error::AppError;

/// Role forwarded by the login gateway: `admin`, `doctor` or `patient`.
pub const ROLE_HEADER: &str = "x-clinic-role";
/// Doctor id forwarded by the login gateway for the `doctor` role.
pub const DOCTOR_ID_HEADER: &str = "x-clinic-doctor-id";

// Credentials are checked upstream; this only reads the identity it forwards.
pub async fn identity_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = principal_from_headers(request.headers())?;
    debug!("Request identity: {:?}", principal);

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let role: Role = headers
        .get(ROLE_HEADER)
        .ok_or_else(|| AppError::Auth("Missing caller identity".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid role header format".to_string()))?
        .parse()
        .map_err(AppError::Auth)?;

    match role {
        Role::Doctor => {
            let doctor_id = headers
                .get(DOCTOR_ID_HEADER)
                .ok_or_else(|| AppError::Auth("Doctor identity without doctor id".to_string()))?
                .to_str()
                .ok()
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .ok_or_else(|| AppError::Auth("Invalid doctor id header".to_string()))?;
            Ok(Principal::doctor(DoctorId(doctor_id)))
        }
        Role::Admin => Ok(Principal::admin()),
        Role::Patient => Ok(Principal::patient()),
    }
}

pub fn require_admin(principal: &Principal) -> Result<(), AppError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

pub fn require_doctor_or_admin(principal: &Principal, doctor_id: DoctorId) -> Result<(), AppError> {
    if principal.is_admin() || principal.acts_for(doctor_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only doctor {} or an admin may view these appointments",
            doctor_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_missing_role_is_unauthenticated() {
        let result = principal_from_headers(&HeaderMap::new());
        assert_matches!(result, Err(AppError::Auth(_)));
    }

    #[test]
    fn test_doctor_requires_id() {
        let result = principal_from_headers(&headers(&[(ROLE_HEADER, "doctor")]));
        assert_matches!(result, Err(AppError::Auth(_)));

        let result = principal_from_headers(&headers(&[
            (ROLE_HEADER, "doctor"),
            (DOCTOR_ID_HEADER, "abc"),
        ]));
        assert_matches!(result, Err(AppError::Auth(_)));
    }

    #[test]
    fn test_roles_are_parsed() {
        let doctor = principal_from_headers(&headers(&[
            (ROLE_HEADER, "Doctor"),
            (DOCTOR_ID_HEADER, "4"),
        ]))
        .unwrap();
        assert_eq!(doctor, Principal::doctor(DoctorId(4)));

        let admin = principal_from_headers(&headers(&[(ROLE_HEADER, "admin")])).unwrap();
        assert!(admin.is_admin());

        let unknown = principal_from_headers(&headers(&[(ROLE_HEADER, "janitor")]));
        assert_matches!(unknown, Err(AppError::Auth(_)));
    }

    #[test]
    fn test_guards() {
        assert!(require_admin(&Principal::admin()).is_ok());
        assert_matches!(require_admin(&Principal::patient()), Err(AppError::Forbidden(_)));

        assert!(require_doctor_or_admin(&Principal::doctor(DoctorId(1)), DoctorId(1)).is_ok());
        assert!(require_doctor_or_admin(&Principal::admin(), DoctorId(1)).is_ok());
        assert_matches!(
            require_doctor_or_admin(&Principal::doctor(DoctorId(2)), DoctorId(1)),
            Err(AppError::Forbidden(_))
        );
    }
}
