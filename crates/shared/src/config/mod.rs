mod database;
mod hashing;
mod jwt;
mod myconfig;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::jwt::{Claims, IssuedToken, JwtConfig, TokenKind};
pub use self::myconfig::{
    CloudinaryConfig, Config, GoogleOAuthConfig, GroqConfig, MidtransConfig, SmtpConfig,
};
