use actix_cors::Cors;
use actix_web::http::{header, Method, Uri};
use log::warn;

const MAX_AGE_SECS: usize = 3600;

/// Builds the CORS policy for the configured origins.
///
/// A `*` entry opens the API to every origin, in which case credentials are
/// not allowed. Otherwise only the listed origins are accepted and may send
/// credentials. Entries that are not valid URIs are skipped.
pub fn cors_policy(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allowed_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(MAX_AGE_SECS);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .filter(|origin| {
            let valid = origin.parse::<Uri>().is_ok();
            if !valid {
                warn!("Ignoring invalid CORS origin {:?}", origin);
            }
            valid
        })
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
        .supports_credentials()
}
