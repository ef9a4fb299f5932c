use serde::Deserialize;

/// Google's JWKS document (the `/oauth2/v3/certs` endpoint).
#[derive(Debug, Deserialize)]
pub struct CertsResponse {
    pub keys: Vec<Jwk>,
}

/// A single RSA signing key from the JWKS document.
#[derive(Debug, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub n: String,
    pub e: String,
    #[serde(default)]
    pub alg: Option<String>,
}

/// Claims of a verified Google ID token.
///
/// `email_verified` must be checked by the caller before trusting `email`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}
