//! Infrastructure implementations of authentication capabilities.

mod bcrypt_hasher;

pub use bcrypt_hasher::BcryptSecretHasher;
