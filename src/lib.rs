pub mod abort;
pub mod config;
pub mod error;
pub mod fido2;
pub mod vault;

pub use abort::AbortSignal;
pub use error::{Fido2Error, Fido2ErrorCode};
pub use fido2::domain::is_valid_rp_id;
pub use fido2::Fido2Authenticator;
pub use vault::credential::Fido2CredentialView;
pub use vault::{CipherService, CipherType, CipherView, LoginView};
