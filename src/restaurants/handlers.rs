use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AdminUser,
    extract::{JsonBody, QueryParams},
    error::{parse_id, AppError},
    pagination::{PageMeta, PageQuery},
    restaurants::{
        dto::{
            CreateRestaurantRequest, RestaurantCreated, RestaurantDeleted, RestaurantPage,
            RestaurantUpdated, UpdateRestaurantRequest,
        },
        repo_types::{NewRestaurant, Restaurant, RestaurantChanges},
    },
    state::AppState,
};

pub const PAGE_SIZE: i64 = 10;

const NOT_FOUND: &str = "Restaurant non trouvé";
const NO_MATCH: &str = "Aucun restaurant trouvé";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/by-name/:name", get(get_by_name))
        .route("/restaurants/by-address/:address", get(get_by_address))
        .route("/restaurants/:id", get(get_restaurant))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants/create-restaurant", post(create_restaurant))
        .route("/restaurants/modify-restaurant/:id", put(update_restaurant))
        .route("/restaurants/delete-restaurant/:id", delete(delete_restaurant))
}

#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<PageQuery>,
) -> Result<Json<RestaurantPage>, AppError> {
    let page = q.fixed(PAGE_SIZE);
    let (data, total) = state.restaurants.list(&page).await?;
    let meta = PageMeta::new(&page, total);
    Ok(Json(RestaurantPage {
        data,
        links: meta.links(),
        meta,
    }))
}

#[instrument(skip(state))]
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    state
        .restaurants
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_MATCH.into()))
}

#[instrument(skip(state))]
pub async fn get_by_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    state
        .restaurants
        .find_by_address(&address)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_MATCH.into()))
}

#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    let id = parse_id(&id)?;
    state
        .restaurants
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantCreated>), AppError> {
    let new = NewRestaurant::try_from(payload)?;
    let saved = state.restaurants.create(new).await?;
    info!(restaurant_id = %saved.id, admin = %admin.id, "restaurant created");
    Ok((
        StatusCode::CREATED,
        Json(RestaurantCreated {
            message: format!("{} a été créé avec succès.", saved.name),
            id: saved.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantUpdated>, AppError> {
    let id = parse_id(&id)?;
    let changes = RestaurantChanges::try_from(payload)?;
    let restaurant = state
        .restaurants
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    info!(restaurant_id = %id, admin = %admin.id, "restaurant updated");
    Ok(Json(RestaurantUpdated {
        message: format!("{} a été modifié avec succès.", restaurant.name),
        restaurant,
    }))
}

#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<RestaurantDeleted>, AppError> {
    let id = parse_id(&id)?;
    let removed = state
        .restaurants
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    info!(restaurant_id = %id, admin = %admin.id, "restaurant deleted");
    Ok(Json(RestaurantDeleted {
        message: format!("{} a été supprimé avec succès.", removed.name),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    use crate::testing::TestApp;
    use crate::users::repo_types::Role;

    async fn seed_many(app: &TestApp, n: usize) {
        for i in 1..=n {
            app.seed_restaurant(&format!("Restaurant {i}"), &format!("{i} Rue Test")).await;
        }
    }

    #[tokio::test]
    async fn create_requires_admin_token() {
        let app = TestApp::new();
        let admin = app.seed_user("admin@test.com", Role::Admin).await;
        let user = app.seed_user("user@test.com", Role::User).await;
        let body = json!({
            "name": "Le Gourmet",
            "address": "123 Rue de Paris",
            "phone": "0123456789",
            "opening_hours": "10h-22h"
        });

        let (status, res) = app
            .send(Method::POST, "/restaurants/create-restaurant", Some(&app.token_for(&admin)), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(res["message"].as_str().unwrap().contains("créé avec succès"));
        let id = res["id"].as_str().unwrap().to_string();

        let (status, res) = app.send(Method::GET, &format!("/restaurants/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["name"], "Le Gourmet");

        let (status, _) = app
            .send(Method::POST, "/restaurants/create-restaurant", None, Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(Method::POST, "/restaurants/create-restaurant", Some(&app.token_for(&user)), Some(body))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let app = TestApp::new();
        let admin = app.seed_user("admin@test.com", Role::Admin).await;
        let (status, res) = app
            .send(
                Method::POST,
                "/restaurants/create-restaurant",
                Some(&app.token_for(&admin)),
                Some(json!({ "name": "Half" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["message"], "address manquant");
    }

    #[tokio::test]
    async fn list_is_paginated_by_ten() {
        let app = TestApp::new();
        seed_many(&app, 15).await;

        let (status, res) = app.send(Method::GET, "/restaurants", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["data"].as_array().unwrap().len(), 10);
        assert_eq!(res["meta"]["per_page"], 10);
        assert_eq!(res["meta"]["total"], 15);
        assert_eq!(res["meta"]["total_pages"], 2);
        assert_eq!(res["links"]["next"], "?page=2");
        assert!(res["links"]["prev"].is_null());

        let (status, res) = app.send(Method::GET, "/restaurants?page=2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["meta"]["current_page"], 2);
        assert_eq!(res["data"].as_array().unwrap().len(), 5);
        assert_eq!(res["data"][0]["name"], "Restaurant 11");
        assert!(res["links"]["next"].is_null());
        assert_eq!(res["links"]["prev"], "?page=1");

        let (_, res) = app.send(Method::GET, "/restaurants?page=0", None, None).await;
        assert_eq!(res["meta"]["current_page"], 1);
    }

    #[tokio::test]
    async fn lookup_by_name_and_address() {
        let app = TestApp::new();
        seed_many(&app, 3).await;

        let (status, res) = app.send(Method::GET, "/restaurants/by-name/Restaurant%201", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["name"], "Restaurant 1");

        let (status, res) = app
            .send(Method::GET, "/restaurants/by-name/Restaurant%20Inexistant", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(res["message"], "Aucun restaurant trouvé");

        let (status, res) = app.send(Method::GET, "/restaurants/by-address/1%20Rue%20Test", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["address"], "1 Rue Test");

        let (status, _) = app
            .send(Method::GET, "/restaurants/by-address/999%20Rue%20Fantome", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_by_id_validates_id() {
        let app = TestApp::new();
        let (status, res) = app.send(Method::GET, "/restaurants/invalid-id", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["message"], "ID invalide");

        let (status, res) = app
            .send(Method::GET, &format!("/restaurants/{}", Uuid::new_v4()), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(res["message"], "Restaurant non trouvé");
    }

    #[tokio::test]
    async fn modify_and_delete_as_admin() {
        let app = TestApp::new();
        let admin = app.seed_user("admin@test.com", Role::Admin).await;
        let user = app.seed_user("user@test.com", Role::User).await;
        let r = app.seed_restaurant("Restaurant 1", "1 Rue Test").await;
        let admin_token = app.token_for(&admin);

        let (status, res) = app
            .send(
                Method::PUT,
                &format!("/restaurants/modify-restaurant/{}", r.id),
                Some(&admin_token),
                Some(json!({ "name": "Restaurant Modifié", "opening_hours": "8h-23h" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(res["message"].as_str().unwrap().contains("modifié avec succès"));
        assert_eq!(res["restaurant"]["name"], "Restaurant Modifié");
        assert_eq!(res["restaurant"]["opening_hours"], "8h-23h");
        assert_eq!(res["restaurant"]["address"], "1 Rue Test");

        let (status, _) = app
            .send(
                Method::PUT,
                &format!("/restaurants/modify-restaurant/{}", r.id),
                Some(&app.token_for(&user)),
                Some(json!({ "name": "Tentative User" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(
                Method::PUT,
                "/restaurants/modify-restaurant/invalid-id",
                Some(&admin_token),
                Some(json!({ "name": "Test" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                Method::PUT,
                &format!("/restaurants/modify-restaurant/{}", Uuid::new_v4()),
                Some(&admin_token),
                Some(json!({ "name": "Fantome" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::DELETE, &format!("/restaurants/delete-restaurant/{}", r.id), None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, res) = app
            .send(Method::DELETE, &format!("/restaurants/delete-restaurant/{}", r.id), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(res["message"].as_str().unwrap().contains("supprimé avec succès"));
        assert!(app.state.restaurants.find_by_id(r.id).await.unwrap().is_none());

        let (status, _) = app
            .send(Method::DELETE, &format!("/restaurants/delete-restaurant/{}", r.id), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_its_menus() {
        let app = TestApp::new();
        let admin = app.seed_user("admin@test.com", Role::Admin).await;
        let token = app.token_for(&admin);
        let doomed = app.seed_restaurant("Restaurant 1", "1 Rue Test").await;
        let kept = app.seed_restaurant("Restaurant 2", "2 Rue Test").await;

        let mut menu_ids = Vec::new();
        for rid in [doomed.id, doomed.id, kept.id] {
            let (status, res) = app
                .send(
                    Method::POST,
                    "/menus",
                    Some(&token),
                    Some(json!({ "name": "Menu", "price": 10.0, "restaurant_id": rid })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            menu_ids.push(res["menu"]["id"].as_str().unwrap().to_string());
        }

        let (status, _) = app
            .send(Method::DELETE, &format!("/restaurants/delete-restaurant/{}", doomed.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        for id in &menu_ids[..2] {
            let (status, _) = app.send(Method::GET, &format!("/menus/{id}"), None, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        let (status, _) = app.send(Method::GET, &format!("/menus/{}", menu_ids[2]), None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn list_survives_out_of_range_page() {
        let app = TestApp::new();
        seed_many(&app, 3).await;

        let (status, res) = app
            .send(Method::GET, "/restaurants?page=9223372036854775807", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["data"].as_array().unwrap().len(), 0);
        assert!(res["links"]["next"].is_null());
        assert_eq!(res["links"]["prev"], format!("?page={}", crate::pagination::MAX_PAGE - 1));
    }
}
