use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::token_provider::{
    IssuedRefreshToken, TokenClaims, TokenDomain, TokenError, TokenProvider, TokenSubject,
};

use super::jwt_config::JwtConfig;

/// HMAC family only. Anything else in a token header is refused before the
/// signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

trait Expiring {
    fn expires_at(&self) -> i64;
}

impl Expiring for TokenClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl Expiring for ResetClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// A token whose `exp` equals the current second is already expired.
pub fn check_expiry(exp: i64, now: i64) -> Result<(), TokenError> {
    if exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[derive(Clone)]
struct DomainKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl DomainKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Clone)]
pub struct JwtTokenService {
    config: JwtConfig,
    access_keys: DomainKeys,
    refresh_keys: DomainKeys,
    reset_keys: DomainKeys,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("config", &self.config)
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            access_keys: DomainKeys::from_secret(&config.access_secret),
            refresh_keys: DomainKeys::from_secret(&config.refresh_secret),
            reset_keys: DomainKeys::from_secret(&config.reset_secret),
            config,
        }
    }

    fn keys_for(&self, domain: TokenDomain) -> &DomainKeys {
        match domain {
            TokenDomain::Access => &self.access_keys,
            TokenDomain::Refresh => &self.refresh_keys,
        }
    }

    fn session_claims(
        subject: &TokenSubject,
        now: DateTime<Utc>,
        expiry_seconds: i64,
    ) -> Result<TokenClaims, TokenError> {
        Ok(TokenClaims {
            user_id: subject.user_id,
            username: subject.username.clone(),
            email: subject.email.clone(),
            role: subject.role,
            sub: subject.user_id.to_string(),
            iat: now.timestamp(),
            exp: Self::expiry_timestamp(now, expiry_seconds)?,
        })
    }

    fn expiry_timestamp(now: DateTime<Utc>, expiry_seconds: i64) -> Result<i64, TokenError> {
        Duration::try_seconds(expiry_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .map(|exp| exp.timestamp())
            .ok_or_else(|| TokenError::EncodingError("token expiry out of range".to_string()))
    }

    fn sign<C: Serialize>(claims: &C, keys: &DomainKeys) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
            .map_err(|e| TokenError::EncodingError(e.to_string()))
    }

    /// Reads `alg` from the unverified header so that `none`, RSA and EC
    /// tokens are classified before any key is involved.
    fn header_algorithm(token: &str) -> Result<String, TokenError> {
        let mut segments = token.split('.');
        let header_segment = match (segments.next(), segments.next(), segments.next()) {
            (Some(header), Some(_), Some(_)) if segments.next().is_none() && !header.is_empty() => {
                header
            }
            _ => return Err(TokenError::Malformed),
        };

        let raw = URL_SAFE_NO_PAD
            .decode(header_segment)
            .map_err(|_| TokenError::Malformed)?;
        let header: serde_json::Value =
            serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

        header
            .get("alg")
            .and_then(|alg| alg.as_str())
            .map(str::to_owned)
            .ok_or(TokenError::Malformed)
    }

    fn verify<C>(&self, token: &str, keys: &DomainKeys) -> Result<C, TokenError>
    where
        C: DeserializeOwned + Expiring,
    {
        let algorithm = Self::header_algorithm(token).map_err(|e| {
            tracing::warn!("Token verification failed: Malformed token header");
            e
        })?;

        if !matches!(algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            tracing::error!(
                algorithm = %algorithm,
                "Security alert: token signed with unexpected algorithm"
            );
            return Err(TokenError::UnexpectedAlgorithm(algorithm));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        // Expiry is checked below with an exclusive bound.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let decoded = decode::<C>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token verification failed: Token expired");
                    TokenError::Expired
                }
                ErrorKind::InvalidSignature => {
                    tracing::error!("Security alert: Invalid token signature detected");
                    TokenError::InvalidSignature
                }
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    tracing::error!("Security alert: token algorithm mismatch");
                    TokenError::UnexpectedAlgorithm(algorithm.clone())
                }
                ErrorKind::MissingRequiredClaim(claim) => {
                    tracing::warn!(claim = %claim, "Token verification failed: missing claim");
                    TokenError::Malformed
                }
                _ => {
                    tracing::warn!(error = %e, "Token verification failed: Malformed token");
                    TokenError::Malformed
                }
            }
        })?;

        check_expiry(decoded.claims.expires_at(), Utc::now().timestamp()).map_err(|e| {
            tracing::debug!("Token verification failed: Token expired");
            e
        })?;

        Ok(decoded.claims)
    }
}

impl TokenProvider for JwtTokenService {
    fn issue_access_token(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        let claims =
            Self::session_claims(subject, Utc::now(), self.config.access_token_expiry)?;
        Self::sign(&claims, &self.access_keys)
    }

    fn issue_refresh_token(
        &self,
        subject: &TokenSubject,
    ) -> Result<IssuedRefreshToken, TokenError> {
        let now = Utc::now();
        let claims = Self::session_claims(subject, now, self.config.refresh_token_expiry)?;
        let token = Self::sign(&claims, &self.refresh_keys)?;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::EncodingError("refresh expiry out of range".to_string()))?;

        Ok(IssuedRefreshToken { token, expires_at })
    }

    fn parse_and_validate(
        &self,
        token: &str,
        domain: TokenDomain,
    ) -> Result<TokenClaims, TokenError> {
        self.verify::<TokenClaims>(token, self.keys_for(domain))
    }

    fn refresh_access_token(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.parse_and_validate(refresh_token, TokenDomain::Refresh)?;

        if claims.user_id.is_nil()
            || claims.username.trim().is_empty()
            || claims.email.trim().is_empty()
        {
            tracing::warn!(
                user_id = %claims.user_id,
                "Refresh token rejected: incomplete claims"
            );
            return Err(TokenError::IncompleteClaims);
        }

        tracing::debug!(
            user_id = %claims.user_id,
            "Refresh token validated, issuing new access token"
        );
        self.issue_access_token(&TokenSubject::from(&claims))
    }

    fn issue_reset_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = ResetClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: Self::expiry_timestamp(now, self.config.reset_token_expiry)?,
        };
        Self::sign(&claims, &self.reset_keys)
    }

    fn verify_reset_token(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.verify::<ResetClaims>(token, &self.reset_keys)?;
        Ok(claims.sub)
    }
}
