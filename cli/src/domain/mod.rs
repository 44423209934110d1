//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod credentials;
pub mod error;
pub mod names;
pub mod params;
pub mod status;

pub use credentials::{
    CURL_HTTP_ERROR_EXIT_CODE, Credentials, SERVICE_KEY_NAME, decode_key_record,
};
pub use error::{ErrorKind, ServiceError};
pub use names::prefixed_random_name;
pub use params::{encode_parameters, provisioning_parameters};
pub use status::{ProvisioningCondition, StatusClass, extract_status};
