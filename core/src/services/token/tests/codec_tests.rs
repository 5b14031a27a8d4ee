//! Unit tests for the token codec

use chrono::{Duration, Utc};

use crate::domain::entities::role::Role;
use crate::domain::entities::token::{Claims, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::services::token::TokenCodec;

fn test_user() -> User {
    let role = Role::new("USER", ["profile:read".to_string()]);
    User::new("alice", "alice@example.com", "$2b$12$hash", role)
}

fn codec() -> TokenCodec {
    TokenCodec::new("test-secret")
}

#[test]
fn test_issue_and_verify_access_token() {
    let codec = codec();
    let user = test_user();

    let token = codec.issue(&Claims::new_access_token(&user)).unwrap();
    let claims = codec.verify(&token, TokenType::Access).unwrap();

    assert_eq!(claims.sub, user.email);
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.roles, vec!["USER".to_string()]);
    assert_eq!(claims.permissions, vec!["profile:read".to_string()]);
}

#[test]
fn test_issue_and_verify_refresh_token() {
    let codec = codec();
    let user = test_user();

    let token = codec.issue(&Claims::new_refresh_token(&user)).unwrap();
    let claims = codec.verify(&token, TokenType::Refresh).unwrap();

    assert_eq!(claims.token_type, TokenType::Refresh);
    assert!(claims.jti.is_some());
}

#[test]
fn test_same_instant_refresh_tokens_differ() {
    let codec = codec();
    let user = test_user();

    let first = codec.issue(&Claims::new_refresh_token(&user)).unwrap();
    let second = codec.issue(&Claims::new_refresh_token(&user)).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_type_mismatch_is_invalid() {
    let codec = codec();
    let user = test_user();

    let access = codec.issue(&Claims::new_access_token(&user)).unwrap();
    let refresh = codec.issue(&Claims::new_refresh_token(&user)).unwrap();

    let err = codec.verify(&access, TokenType::Refresh).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));

    let err = codec.verify(&refresh, TokenType::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_foreign_signature_is_invalid() {
    let user = test_user();
    let token = TokenCodec::new("other-secret")
        .issue(&Claims::new_access_token(&user))
        .unwrap();

    let err = codec().verify(&token, TokenType::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_foreign_issuer_is_invalid() {
    let codec = codec();
    let user = test_user();

    let mut claims = Claims::new_access_token(&user);
    claims.iss = "someone-else".to_string();
    let token = codec.issue(&claims).unwrap();

    let err = codec.verify(&token, TokenType::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_expiry_collapses_to_invalid() {
    let codec = codec();
    let user = test_user();

    // Well past the verification leeway
    let mut claims = Claims::new_access_token(&user);
    claims.exp = (Utc::now() - Duration::minutes(10)).timestamp();
    let token = codec.issue(&claims).unwrap();

    let err = codec.verify(&token, TokenType::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_malformed_token_is_invalid() {
    let err = codec()
        .verify("definitely.not.a-jwt", TokenType::Access)
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[test]
fn test_lenient_verify_accepts_aged_out_authentic_token() {
    let codec = codec();
    let user = test_user();

    let mut claims = Claims::new_access_token(&user);
    claims.exp = (Utc::now() - Duration::minutes(10)).timestamp();
    let token = codec.issue(&claims).unwrap();

    let decoded = codec
        .verify_ignoring_expiry(&token, TokenType::Access)
        .unwrap();
    assert_eq!(decoded.exp, claims.exp);
}

#[test]
fn test_lenient_verify_still_rejects_foreign_signature() {
    let user = test_user();
    let token = TokenCodec::new("other-secret")
        .issue(&Claims::new_access_token(&user))
        .unwrap();

    let err = codec()
        .verify_ignoring_expiry(&token, TokenType::Access)
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}
