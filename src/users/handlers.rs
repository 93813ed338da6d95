use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::{AdminUser, AuthUser},
    extract::{JsonBody, QueryParams},
    error::{parse_id, AppError},
    pagination::{PageQuery, Paged},
    state::AppState,
    users::{
        dto::{UpdateUserRequest, UserDeleted, UserUpdated},
        repo::SORTABLE,
        repo_types::User,
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub fn my_account_routes() -> Router<AppState> {
    Router::new().route(
        "/my-account",
        get(get_my_account)
            .put(update_my_account)
            .delete(delete_my_account),
    )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    QueryParams(q): QueryParams<PageQuery>,
) -> Result<Json<Paged<User>>, AppError> {
    let page = q.request(SORTABLE)?;
    let (users, total) = state.users.list(&page).await?;
    Ok(Json(Paged::new(users, &page, total)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(services::find(state.users.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserUpdated>, AppError> {
    let id = parse_id(&id)?;
    let user = services::update(state.users.as_ref(), &actor, id, payload).await?;
    Ok(Json(UserUpdated {
        message: format!("L'utilisateur {id} a bien été modifié"),
        user,
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserDeleted>, AppError> {
    let id = parse_id(&id)?;
    services::delete(state.users.as_ref(), &actor, id).await?;
    Ok(Json(UserDeleted {
        message: format!("L'utilisateur {id} a bien été supprimé"),
    }))
}

#[instrument(skip(state))]
pub async fn get_my_account(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(services::find(state.users.as_ref(), me.id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_my_account(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserUpdated>, AppError> {
    let user = services::update(state.users.as_ref(), &me, me.id, payload).await?;
    Ok(Json(UserUpdated {
        message: "Compte mis à jour".into(),
        user,
    }))
}

#[instrument(skip(state))]
pub async fn delete_my_account(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<UserDeleted>, AppError> {
    services::delete(state.users.as_ref(), &me, me.id).await?;
    Ok(Json(UserDeleted {
        message: "Compte supprimé avec succès".into(),
    }))
}
