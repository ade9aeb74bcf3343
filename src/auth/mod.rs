//! Authentication and authorization

pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod redis_registry;
pub mod service;
pub mod session;

pub use guard::{is_authorized, RequiredRoles};
pub use jwt::{AccessClaims, AccessTokenData, Claims, RefreshClaims, RefreshTokenData, TokenIssuer};
pub use middleware::{bearer_token, require_auth, require_roles, with_roles, ActiveUser};
pub use models::{Credentials, RefreshTokenRequest, TokenPair, User, UserRole};
pub use password::PasswordHasher;
pub use redis_registry::RedisSessionRegistry;
pub use service::AuthenticationService;
pub use session::{InMemorySessionRegistry, SessionRegistry};
