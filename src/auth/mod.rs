//! Authentication core: password hashing, token issuance and verification,
//! credential storage, and the session lifecycle controller.

pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use service::{AuthError, AuthService, AuthSession};
pub use store::{NewUser, StoreError, UserStore};
pub use token::{
    issue_token_pair, verify_access_token, verify_refresh_token, AccessClaims, RefreshClaims,
    TokenConfig, TokenError, TokenPair,
};
