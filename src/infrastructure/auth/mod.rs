//! Authentication infrastructure: password hashing and JWT handling

mod jwt;
mod password;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
pub use password::{Argon2Hasher, PasswordHasher};
