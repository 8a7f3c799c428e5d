//! Authentication: JWT tokens, password hashing and middleware

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_manager};
pub use password::{hash_password, verify_password};
