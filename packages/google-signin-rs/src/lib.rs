// Server-side verification of Google Sign-In ID tokens: fetch Google's
// published JWKS, check the RS256 signature, and pin audience + issuer.

pub mod models;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use thiserror::Error;

use crate::models::{CertsResponse, IdTokenClaims};

const CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

// Google historically issues tokens under both spellings.
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Clone)]
pub struct GoogleSignInOptions {
    /// OAuth client id the token must be issued for (the `aud` claim).
    pub client_id: String,
}

#[derive(Debug, Clone)]
pub struct GoogleSignInService {
    options: GoogleSignInOptions,
    http: Client,
}

#[derive(Debug, Error)]
pub enum GoogleSignInError {
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("no Google signing key matches the token key id")]
    UnknownKeyId,
    #[error("failed to fetch Google signing keys: {0}")]
    Keys(#[from] reqwest::Error),
    #[error("invalid ID token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl GoogleSignInService {
    pub fn new(options: GoogleSignInOptions) -> Self {
        Self {
            options,
            http: Client::new(),
        }
    }

    /// Verify an ID token issued by Google Sign-In and return its claims.
    ///
    /// The token's signature is checked against Google's current signing
    /// keys, the audience against the configured client id, and the issuer
    /// against Google's two issuer spellings. Expiry is enforced by the
    /// JWT validation itself.
    pub async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<IdTokenClaims, GoogleSignInError> {
        let header = decode_header(id_token)?;
        let kid = header.kid.ok_or(GoogleSignInError::MissingKeyId)?;

        let certs: CertsResponse = self
            .http
            .get(CERTS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let jwk = certs
            .keys
            .iter()
            .find(|key| key.kid == kid)
            .ok_or(GoogleSignInError::UnknownKeyId)?;

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.options.client_id.as_str()]);
        validation.set_issuer(&ISSUERS);

        let data = decode::<IdTokenClaims>(id_token, &decoding_key, &validation)?;
        Ok(data.claims)
    }
}
