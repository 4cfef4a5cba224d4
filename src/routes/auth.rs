use crate::{
    auth::{AuthResponse, SigninRequest, SignupRequest},
    error::AppError,
    models::NewUser,
    repository::EMAIL_TAKEN,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use log::info;
use validator::Validate;

/// Message for every failed signin, whether the email exists or not.
pub const INVALID_SIGNIN: &str = "Invalid email or password";

/// Create an account
///
/// Validates the payload, stores the account with a bcrypt hash of the password
/// and returns a bearer token for it.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let SignupRequest {
        email,
        password,
        name,
    } = signup_data.into_inner();

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(EMAIL_TAKEN.into()));
    }

    let credentials = state.credentials.clone();
    let password_hash = web::block(move || credentials.hash_password(&password)).await??;

    let user = state
        .users
        .create(NewUser::new(email, name, password_hash))
        .await?;
    let token = state.credentials.issue_token(&user.identity(), Utc::now())?;

    info!("Registered account {}", user.id);
    Ok(HttpResponse::Created().json(AuthResponse::new(&user, token)))
}

/// Sign in
///
/// Exchanges an email and password for a bearer token. Unknown emails and wrong
/// passwords produce the same response.
#[post("/signin")]
pub async fn signin(
    state: web::Data<AppState>,
    signin_data: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    signin_data.validate()?;
    let SigninRequest { email, password } = signin_data.into_inner();

    let user = state.users.find_by_email(&email).await?;

    let credentials = state.credentials.clone();
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let verified = web::block(move || match stored_hash {
        Some(hash) => credentials.verify_password(&password, &hash),
        None => credentials.reject_unknown_account(&password),
    })
    .await?;

    match user {
        Some(user) if verified => {
            let token = state.credentials.issue_token(&user.identity(), Utc::now())?;
            info!("Account {} signed in", user.id);
            Ok(HttpResponse::Ok().json(AuthResponse::new(&user, token)))
        }
        _ => Err(AppError::Unauthorized(INVALID_SIGNIN.into())),
    }
}
