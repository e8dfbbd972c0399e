//! Session token verification and issuing.
//!
//! A session token is an HS256 JWT signed with the shared `auth.secret`. The
//! resolver looks for it in the session cookie first and, when allowed, in an
//! `Authorization: Bearer` header. Every way verification can fail collapses
//! into "no caller": the gate then treats the request as anonymous.

use {
    crate::{AuthConfig, Error, Result},
    axum::{
        extract::{OptionalFromRequestParts, Request},
        http::{HeaderMap, request::Parts},
    },
    axum_extra::{
        extract::cookie::CookieJar,
        headers::{Authorization, HeaderMapExt, authorization::Bearer},
    },
    jsonwebtoken::{
        Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
        errors::ErrorKind as JwtErrorKind, get_current_timestamp,
    },
    serde::{Deserialize, Serialize},
    std::{convert::Infallible, time::Duration},
    thiserror::Error,
};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Stable caller identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (seconds since the epoch).
    pub iat: u64,
    /// Expires at (seconds since the epoch).
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// The authenticated caller of one request.
///
/// Inserted into request extensions by the gate. Handlers take it as
/// `Option<CallerIdentity>`; it is absent for anonymous callers and for
/// requests the gate does not intercept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CallerIdentity {
    /// Name to greet the caller with, falling back to `"User"`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("User")
    }
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

impl<S> OptionalFromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CallerIdentity>().cloned())
    }
}

/// Why a request carries no usable session.
///
/// Never surfaced to the caller. Only used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no session credential presented")]
    Missing,
    #[error("session credential rejected: {0}")]
    Invalid(InvalidCredential),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCredential {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("unexpected issuer")]
    WrongIssuer,
    #[error("required claim missing")]
    MissingClaim,
    #[error("token not acceptable")]
    Rejected,
}

impl From<jsonwebtoken::errors::Error> for CredentialError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let reason = match err.kind() {
            JwtErrorKind::ExpiredSignature => InvalidCredential::Expired,
            JwtErrorKind::InvalidSignature => InvalidCredential::BadSignature,
            JwtErrorKind::InvalidIssuer => InvalidCredential::WrongIssuer,
            JwtErrorKind::MissingRequiredClaim(_) => InvalidCredential::MissingClaim,
            JwtErrorKind::InvalidToken
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_) => InvalidCredential::Malformed,
            _ => InvalidCredential::Rejected,
        };
        CredentialError::Invalid(reason)
    }
}

/// Verifies session tokens against the shared secret.
#[derive(Clone)]
pub struct SessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    accept_bearer: bool,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("cookie_name", &self.cookie_name)
            .field("accept_bearer", &self.accept_bearer)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl SessionResolver {
    /// Builds a resolver. Fails when the secret is missing: a resolver that
    /// cannot verify anything must not be constructed.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway.as_secs();
        match &config.issuer {
            Some(issuer) => {
                validation.set_required_spec_claims(&["exp", "sub", "iss"]);
                validation.set_issuer(&[issuer]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub"]),
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose().as_bytes()),
            validation,
            cookie_name: config.cookie_name.clone(),
            accept_bearer: config.accept_bearer,
        })
    }

    /// Resolves the caller of `request`, or `None` when it is anonymous.
    pub fn resolve<B>(&self, request: &Request<B>) -> Option<CallerIdentity> {
        self.resolve_headers(request.headers())
    }

    pub fn resolve_headers(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
        match self.verify(headers) {
            Ok(claims) => Some(claims.into()),
            Err(CredentialError::Missing) => None,
            Err(err) => {
                tracing::debug!(reason = %err, "Ignoring session credential");
                None
            }
        }
    }

    /// Like [`resolve_headers`](Self::resolve_headers) but keeps the reason.
    pub fn verify(&self, headers: &HeaderMap) -> std::result::Result<Claims, CredentialError> {
        let token = self.extract_token(headers).ok_or(CredentialError::Missing)?;
        self.verify_token(&token)
    }

    pub fn verify_token(&self, token: &str) -> std::result::Result<Claims, CredentialError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(CredentialError::Invalid(InvalidCredential::MissingClaim));
        }
        Ok(data.claims)
    }

    fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(&self.cookie_name)
            && !cookie.value().is_empty()
        {
            return Some(cookie.value().to_owned());
        }

        if self.accept_bearer {
            return headers
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_owned())
                .filter(|token| !token.is_empty());
        }

        None
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

/// Mints session tokens with the shared secret.
///
/// Production sign-in is handled by the identity provider; the issuer exists
/// for local development (`dashgate issue-token`) and tests.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
    issuer: Option<String>,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl SessionIssuer {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.expose().as_bytes()),
            ttl: config.token_ttl,
            issuer: config.issuer.clone(),
        })
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Claims for `subject`, valid from now for the configured TTL.
    pub fn claims_for(
        &self,
        subject: impl Into<String>,
        name: Option<String>,
        email: Option<String>,
    ) -> Claims {
        let now = get_current_timestamp();
        Claims {
            sub: subject.into(),
            name,
            email,
            iat: now,
            exp: now.saturating_add(self.ttl.as_secs()),
            iss: self.issuer.clone(),
        }
    }

    pub fn issue(
        &self,
        subject: impl Into<String>,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<String> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(Error::invalid_input("token subject must not be empty"));
        }
        self.sign(&self.claims_for(subject, name, email))
    }

    /// Signs arbitrary claims as given.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding_key)?)
    }
}
