//! Roles, sessions and request authorization.

pub mod gate;
pub mod middleware;
pub mod password;
pub mod role;
pub mod session;

pub use gate::{require, AccessError, Principal, RoleGate};
pub use middleware::{authorize, bearer_token, GateState, PrincipalResolver, TOKEN_HEADER};
pub use password::{CredentialHasher, PasswordError};
pub use role::Role;
pub use session::{IssuedToken, SessionStore};
