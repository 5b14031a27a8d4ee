//! Stateless signer/verifier for bearer tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenType, JWT_ISSUER};
use crate::errors::{DomainError, DomainResult, TokenError};

/// Signs and verifies JWTs with a single server-held secret and a fixed
/// issuer identity.
///
/// Verification collapses every failure mode (bad signature, wrong
/// issuer, malformed payload, past expiry, wrong token type) into
/// [`TokenError::InvalidToken`] so callers cannot probe why a token was
/// rejected.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lenient_validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the server signing secret
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.validate_exp = true;

        // Signature and issuer still enforced; only the expiry check is
        // skipped. Used to read the exp claim of an aged-out access token.
        let mut lenient_validation = validation.clone();
        lenient_validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
            lenient_validation,
        }
    }

    /// Signs the given claims into a compact JWT
    pub fn issue(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenCreationFailed))
    }

    /// Verifies a token and checks it carries the expected type claim
    pub fn verify(&self, token: &str, expected: TokenType) -> DomainResult<Claims> {
        self.decode_with(token, expected, &self.validation)
    }

    /// Verifies signature, issuer and type but accepts a past expiry
    pub fn verify_ignoring_expiry(&self, token: &str, expected: TokenType) -> DomainResult<Claims> {
        self.decode_with(token, expected, &self.lenient_validation)
    }

    fn decode_with(
        &self,
        token: &str,
        expected: TokenType,
        validation: &Validation,
    ) -> DomainResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, validation)
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        if data.claims.token_type != expected {
            return Err(DomainError::Token(TokenError::InvalidToken));
        }

        Ok(data.claims)
    }
}
