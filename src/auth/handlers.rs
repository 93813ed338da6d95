use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    extract::JsonBody,
    error::AppError,
    state::AppState,
    users::services,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/authentication/register", post(register))
        .route("/authentication/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user = services::register(
        state.users.as_ref(),
        &payload.email,
        &payload.username,
        payload.password,
    )
    .await?;

    Ok(Json(RegisterResponse {
        message: format!(
            "Bienvenue {}, ton compte a été créé avec succès. Tu peux te connecter !",
            user.username
        ),
        id: user.id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) =
        services::login(state.users.as_ref(), &state.jwt, &payload.email, payload.password).await?;

    Ok(Json(LoginResponse {
        message: format!("Salut {}, tu as été connecté avec succès !", user.username),
        token,
    }))
}
