use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{parse_id, AppError};
use crate::menus::repo_types::{Menu, MenuChanges, NewMenu};

#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub restaurant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub restaurant_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub restaurant_id: Option<String>,
}

fn check_price(price: f64) -> Result<f64, AppError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(AppError::BadRequest("Le prix doit être positif".into()))
    }
}

fn check_name(name: String) -> Result<String, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name ne peut pas être vide".into()));
    }
    Ok(name)
}

impl TryFrom<CreateMenuRequest> for NewMenu {
    type Error = AppError;

    fn try_from(r: CreateMenuRequest) -> Result<Self, Self::Error> {
        let restaurant_id = r
            .restaurant_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("restaurant_id manquant".into()))?;
        let name = r
            .name
            .ok_or_else(|| AppError::BadRequest("name manquant".into()))?;
        let price = r
            .price
            .ok_or_else(|| AppError::BadRequest("price manquant".into()))?;
        Ok(Self {
            name: check_name(name)?,
            description: r.description,
            price: check_price(price)?,
            category: r.category,
            restaurant_id: parse_id(&restaurant_id)?,
        })
    }
}

impl TryFrom<UpdateMenuRequest> for MenuChanges {
    type Error = AppError;

    fn try_from(r: UpdateMenuRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.name.map(check_name).transpose()?,
            description: r.description,
            price: r.price.map(check_price).transpose()?,
            category: r.category,
            restaurant_id: r.restaurant_id.as_deref().map(parse_id).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MenuSaved {
    pub message: String,
    pub menu: Menu,
}

#[derive(Debug, Serialize)]
pub struct MenuDeleted {
    pub message: String,
    pub id: Uuid,
}
