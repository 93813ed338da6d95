use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    extract::{JsonBody, QueryParams},
    error::{parse_id, AppError},
    menus::{
        dto::{CreateMenuRequest, MenuDeleted, MenuListQuery, MenuSaved, UpdateMenuRequest},
        repo::SORTABLE,
        repo_types::{Menu, MenuChanges, NewMenu},
    },
    pagination::{PageQuery, Paged},
    state::AppState,
};

const MENU_NOT_FOUND: &str = "Menu non trouvé";
const RESTAURANT_NOT_FOUND: &str = "Restaurant non trouvé";

pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/menus", get(list_menus).post(create_menu))
        .route(
            "/menus/:id",
            get(get_menu).put(update_menu).delete(delete_menu),
        )
}

async fn ensure_restaurant(state: &AppState, id: Uuid) -> Result<(), AppError> {
    match state.restaurants.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(RESTAURANT_NOT_FOUND.into())),
    }
}

#[instrument(skip(state))]
pub async fn list_menus(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<MenuListQuery>,
) -> Result<Json<Paged<Menu>>, AppError> {
    let page = q.request(SORTABLE)?;
    let restaurant_id = filter
        .restaurant_id
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(parse_id)
        .transpose()?;
    let (menus, total) = state.menus.list(&page, restaurant_id).await?;
    Ok(Json(Paged::new(menus, &page, total)))
}

#[instrument(skip(state))]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Menu>, AppError> {
    let id = parse_id(&id)?;
    state
        .menus
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(MENU_NOT_FOUND.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_menu(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CreateMenuRequest>,
) -> Result<Json<MenuSaved>, AppError> {
    let new = NewMenu::try_from(payload)?;
    ensure_restaurant(&state, new.restaurant_id).await?;
    let menu = state.menus.create(new).await?;
    info!(menu_id = %menu.id, admin = %admin.id, "menu created");
    Ok(Json(MenuSaved {
        message: format!("Le menu {} a été créé avec succès.", menu.name),
        menu,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_menu(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateMenuRequest>,
) -> Result<Json<MenuSaved>, AppError> {
    let id = parse_id(&id)?;
    let changes = MenuChanges::try_from(payload)?;
    if let Some(rid) = changes.restaurant_id {
        ensure_restaurant(&state, rid).await?;
    }
    let menu = state
        .menus
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(MENU_NOT_FOUND.into()))?;
    info!(menu_id = %id, admin = %admin.id, "menu updated");
    Ok(Json(MenuSaved {
        message: format!("Le menu {} a été modifié avec succès.", menu.name),
        menu,
    }))
}

#[instrument(skip(state))]
pub async fn delete_menu(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MenuDeleted>, AppError> {
    let id = parse_id(&id)?;
    let menu = state
        .menus
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(MENU_NOT_FOUND.into()))?;
    info!(menu_id = %id, admin = %admin.id, "menu deleted");
    Ok(Json(MenuDeleted {
        message: format!("Le menu {} a été supprimé avec succès.", menu.name),
        id,
    }))
}
