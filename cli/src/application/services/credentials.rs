//! Credential resolver: issues a service key and reads the credentials it
//! carries.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use tracing::debug;

use crate::application::ports::ServiceKeys;
use crate::domain::{CURL_HTTP_ERROR_EXIT_CODE, Credentials, ServiceError, decode_key_record};

use super::{failure_reason, run_error_reason, stdout_line};

/// Return the credentials of `instance`, issuing service key `key` on first use.
///
/// A populated `cache` is returned as is; the gateway is not touched. Otherwise
/// the key is created, its guid looked up and its record fetched, and the
/// decoded map is stored in `cache` before it is returned. Key creation is a
/// side effect on the platform, so it happens at most once per cache.
///
/// # Errors
///
/// - [`ServiceError::KeyCreationFailed`] if `cf create-service-key` fails.
/// - [`ServiceError::KeyLookupFailed`] if the key guid cannot be read.
/// - [`ServiceError::KeyFetchFailed`] if `cf curl` reports an HTTP error.
/// - [`ServiceError::DecodeFailed`] if the key record has the wrong shape.
pub async fn resolve<'c>(
    keys: &impl ServiceKeys,
    instance: &str,
    key: &str,
    cache: &'c mut Option<Credentials>,
    timeout: Duration,
) -> Result<&'c Credentials, ServiceError> {
    let credentials = match cache.take() {
        Some(credentials) => credentials,
        None => fetch(keys, instance, key, timeout).await?,
    };
    Ok(cache.insert(credentials))
}

async fn fetch(
    keys: &impl ServiceKeys,
    instance: &str,
    key: &str,
    timeout: Duration,
) -> Result<Credentials, ServiceError> {
    let created = keys
        .create_service_key(instance, key, timeout)
        .await
        .map_err(|e| ServiceError::KeyCreationFailed {
            instance: instance.to_string(),
            reason: run_error_reason("cf create-service-key", &e),
        })?;
    if !created.status.success() {
        return Err(ServiceError::KeyCreationFailed {
            instance: instance.to_string(),
            reason: failure_reason("cf create-service-key", &created),
        });
    }

    let lookup = keys
        .service_key_guid(instance, key, timeout)
        .await
        .map_err(|e| ServiceError::KeyLookupFailed {
            instance: instance.to_string(),
            reason: run_error_reason("cf service-key", &e),
        })?;
    if !lookup.status.success() {
        return Err(ServiceError::KeyLookupFailed {
            instance: instance.to_string(),
            reason: failure_reason("cf service-key", &lookup),
        });
    }
    let guid = stdout_line(&lookup);
    if guid.is_empty() {
        return Err(ServiceError::KeyLookupFailed {
            instance: instance.to_string(),
            reason: format!("cf service-key printed no guid for key {key}"),
        });
    }
    debug!(instance = %instance, key = %key, guid = %guid, "service key issued");

    let record = keys
        .fetch_service_key(&guid, timeout)
        .await
        .map_err(|e| ServiceError::KeyFetchFailed {
            instance: instance.to_string(),
            reason: run_error_reason("cf curl", &e),
        })?;
    // cf curl exits non-zero for reasons other than HTTP errors; only 22 counts.
    if record.status.code() == Some(CURL_HTTP_ERROR_EXIT_CODE) {
        return Err(ServiceError::KeyFetchFailed {
            instance: instance.to_string(),
            reason: failure_reason("cf curl", &record),
        });
    }

    decode_key_record(&record.stdout).map_err(|e| ServiceError::DecodeFailed {
        instance: instance.to_string(),
        reason: format!("service key {guid}: {e}"),
    })
}
