pub mod domain;
pub mod ports;

pub use domain::{AuthResult, Identity, Profile, ProfileUpdate, SignInData, SignUpData};
pub use ports::{
    AuthError, AuthErrorKind, AuthStateStream, CredentialGateway, PortError, PortResult,
    ProfileStore, StoreError, StoreErrorKind,
};
