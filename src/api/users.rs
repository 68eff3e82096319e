//! Account API: registration and the session lifecycle

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::password::hash;
use crate::password::verify;
use crate::storage::CreateUserValues;
use crate::storage::Storage;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;

/// The user response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The user ID
    pub id: Uuid,

    /// The username
    pub username: String,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Registration form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Username of the new account
    username: String,
    /// Password of the new account
    password: String,
}

/// Register a new account
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "alice", "password": "verysecret" }' \
///     http://localhost:6000/register
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "username": "alice" } }
/// ```
pub async fn register<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<UserResponse>, Error> {
    let username = form.username.trim();

    if username.is_empty() {
        return Err(Error::bad_request("Username is required"));
    }

    if form.password.is_empty() {
        return Err(Error::bad_request("Password is required"));
    }

    let existing = storage
        .find_single_user_by_username(username)
        .await
        .map_err(Error::internal_server_error)?;

    if existing.is_some() {
        return Err(Error::conflict("Username already taken"));
    }

    let hashed_password = hash(&form.password);

    let values = CreateUserValues {
        session_id: &Uuid::new_v4(),
        username,
        hashed_password: &hashed_password,
    };

    let user = storage
        .create_user(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(UserResponse::from_user(user)))
}

/// Login form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Username of the user
    username: String,
    /// Password of the user
    password: String,
}

/// Get a token for a user session
///
/// The token can then be used to access the protected routes by using it in
/// the `Authorization` header
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "alice", "password": "verysecret" }' \
///     http://localhost:6000/login
/// ```
///
/// Response:
/// ```json
/// { "data": { "type": "Bearer", "access_token": "some token" } }
/// ```
pub async fn token<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    Form(form): Form<LoginForm>,
) -> Result<Success<Token>, Error> {
    let user = storage
        .find_single_user_by_username(&form.username)
        .await
        .map_err(Error::internal_server_error)?;

    // same response for an unknown user and a wrong password
    if let Some(user) = user {
        if verify(&user.hashed_password, &form.password) {
            let token = generate_token(&jwt_keys, &user)?;

            Ok(Success::ok(token))
        } else {
            Err(Error::bad_request("Invalid username or password"))
        }
    } else {
        Err(Error::bad_request("Invalid username or password"))
    }
}

/// End the current session
///
/// Rotates the session ID of the current user, which invalidates every
/// outstanding token. Logging out twice is harmless.
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/logout
/// ```
pub async fn logout<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<&'static str>, Error> {
    storage
        .rotate_session(&current_user, &Uuid::new_v4())
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}
