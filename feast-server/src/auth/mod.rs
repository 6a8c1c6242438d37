//! 认证模块
//!
//! JWT 令牌签发/验证、Argon2 密码哈希和认证中间件。

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
