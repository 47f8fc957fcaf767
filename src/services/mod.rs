pub mod token_service;
pub use token_service::{TokenError, TokenService};

pub mod token_service_impl;
pub use token_service_impl::SeaOrmTokenService;

pub mod activation;
pub use activation::{Activation, ActivationEngine};

pub mod dispatch;
pub use dispatch::{ActionDispatcher, Dispatch, DispatchError};

pub mod host;
pub use host::{EnrollmentHost, Group, HostError, UserDirectory, UserIdentity};

pub mod backup;
pub use backup::{BackupCodec, BackupError};
