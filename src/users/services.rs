use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{claims::Identity, jwt::JwtKeys, password, policy},
    config::AdminBootstrap,
    error::AppError,
    users::{
        dto::UpdateUserRequest,
        repo::{DuplicateEmail, UserRepo},
        repo_types::{NewUser, Role, User, UserChanges},
    },
};

pub const MIN_PASSWORD_LEN: usize = 8;

const EMAIL_TAKEN: &str = "Email déjà existant, veuillez utiliser une autre adresse email";
const USER_NOT_FOUND: &str = "Utilisateur introuvable dans la base de données";
const UNKNOWN_EMAIL: &str = "Aucun utilisateur n'a été trouvé avec cet email";
const WRONG_PASSWORD: &str = "Le mot de passe est incorrect !";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Email invalide".into()));
    }
    Ok(email)
}

fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Nom d'utilisateur manquant".into()));
    }
    Ok(username.to_string())
}

fn check_password(plain: &str) -> Result<(), AppError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest(format!(
            "Le mot de passe doit contenir au moins {MIN_PASSWORD_LEN} caractères"
        )));
    }
    Ok(())
}

fn conflict_on_duplicate(e: anyhow::Error) -> AppError {
    if e.is::<DuplicateEmail>() {
        AppError::Conflict(EMAIL_TAKEN.into())
    } else {
        AppError::Internal(e)
    }
}

/// Creates a regular user. The email is checked before insert; the unique
/// index catches the concurrent-registration window.
pub async fn register(
    users: &dyn UserRepo,
    email: &str,
    username: &str,
    plain_password: String,
) -> Result<User, AppError> {
    let email = normalize_email(email)?;
    let username = normalize_username(username)?;
    check_password(&plain_password)?;

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let password_hash = password::hash_password(plain_password).await?;
    let user = users
        .create(NewUser {
            email,
            username,
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(conflict_on_duplicate)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Verifies credentials and issues a token.
pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    email: &str,
    plain_password: String,
) -> Result<(User, String), AppError> {
    let email = email.trim().to_lowercase();

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::NotFound(UNKNOWN_EMAIL.into()));
    };

    if !password::verify_password(plain_password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Forbidden(WRONG_PASSWORD.into()));
    }

    let token = keys.issue(Identity {
        id: user.id,
        role: user.role,
    })?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

pub async fn find(users: &dyn UserRepo, id: Uuid) -> Result<User, AppError> {
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))
}

/// Applies a partial update on behalf of `actor`, who must be the owner or an admin.
pub async fn update(
    users: &dyn UserRepo,
    actor: &Identity,
    target: Uuid,
    req: UpdateUserRequest,
) -> Result<User, AppError> {
    policy::self_or_admin(actor, target)?;
    if req.role.is_some() {
        policy::admin_only(actor)?;
    }

    let existing = find(users, target).await?;

    let mut changes = UserChanges {
        role: req.role,
        ..Default::default()
    };

    if let Some(raw) = req.email.as_deref() {
        let email = normalize_email(raw)?;
        if email != existing.email {
            if let Some(other) = users.find_by_email(&email).await? {
                if other.id != target {
                    warn!(email = %email, "email already used by another account");
                    return Err(AppError::Conflict(EMAIL_TAKEN.into()));
                }
            }
            changes.email = Some(email);
        }
    }
    if let Some(raw) = req.username.as_deref() {
        changes.username = Some(normalize_username(raw)?);
    }
    if let Some(plain) = req.password {
        check_password(&plain)?;
        changes.password_hash = Some(password::hash_password(plain).await?);
    }

    let user = users
        .update(target, changes)
        .await
        .map_err(conflict_on_duplicate)?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    info!(user_id = %user.id, actor = %actor.id, "user updated");
    Ok(user)
}

pub async fn delete(users: &dyn UserRepo, actor: &Identity, target: Uuid) -> Result<User, AppError> {
    policy::self_or_admin(actor, target)?;
    let user = users
        .delete(target)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;
    info!(user_id = %user.id, actor = %actor.id, "user deleted");
    Ok(user)
}

/// Seeds the configured admin account unless its email is already taken.
pub async fn ensure_admin(users: &dyn UserRepo, admin: &AdminBootstrap) -> anyhow::Result<()> {
    let email = admin.email.trim().to_lowercase();
    anyhow::ensure!(is_valid_email(&email), "ADMIN_EMAIL is not a valid email");
    anyhow::ensure!(
        admin.password.chars().count() >= MIN_PASSWORD_LEN,
        "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LEN} characters"
    );

    if let Some(existing) = users.find_by_email(&email).await? {
        if existing.role != Role::Admin {
            warn!(user_id = %existing.id, "bootstrap email belongs to a non-admin account; leaving it untouched");
        }
        return Ok(());
    }

    let password_hash = password::hash_password(admin.password.clone()).await?;
    let user = users
        .create(NewUser {
            email,
            username: admin.username.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %user.id, "bootstrap admin created");
    Ok(())
}
