use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::controllers::{to_api_error, ApiError};

/// Оператор с действующей сессией.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub subject: String,
    /// `None`, когда авторизация отключена в конфигурации.
    pub expires_at: Option<i64>,
}

// Bearer-token extractor
impl FromRequestParts<Arc<crate::AppState>> for SessionUser {
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.features.enable_auth {
            return Ok(SessionUser { subject: "anonymous".to_string(), expires_at: None });
        }

        let unauthorized = || to_api_error(StatusCode::UNAUTHORIZED, "Access denied");

        // Получаем заголовок Authorization
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;

        // Проверяем что это Bearer
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(unauthorized)?;

        let claims = state.sessions.verify(token.trim()).map_err(|_| unauthorized())?;

        Ok(SessionUser { subject: claims.sub, expires_at: Some(claims.exp) })
    }
}
