use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pagination::{PageLinks, PageMeta};
use crate::restaurants::repo_types::{NewRestaurant, Restaurant, RestaurantChanges};

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    non_blank(value, field)?.ok_or_else(|| AppError::BadRequest(format!("{field} manquant")))
}

fn non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(AppError::BadRequest(format!("{field} ne peut pas être vide"))),
        other => Ok(other),
    }
}

impl TryFrom<CreateRestaurantRequest> for NewRestaurant {
    type Error = AppError;

    fn try_from(r: CreateRestaurantRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(r.name, "name")?,
            address: required(r.address, "address")?,
            phone: required(r.phone, "phone")?,
            opening_hours: required(r.opening_hours, "opening_hours")?,
        })
    }
}

impl TryFrom<UpdateRestaurantRequest> for RestaurantChanges {
    type Error = AppError;

    fn try_from(r: UpdateRestaurantRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: non_blank(r.name, "name")?,
            address: non_blank(r.address, "address")?,
            phone: non_blank(r.phone, "phone")?,
            opening_hours: non_blank(r.opening_hours, "opening_hours")?,
        })
    }
}

/// Fixed-size page with navigation links.
#[derive(Debug, Serialize)]
pub struct RestaurantPage {
    pub data: Vec<Restaurant>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

#[derive(Debug, Serialize)]
pub struct RestaurantCreated {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RestaurantUpdated {
    pub message: String,
    pub restaurant: Restaurant,
}

#[derive(Debug, Serialize)]
pub struct RestaurantDeleted {
    pub message: String,
}
