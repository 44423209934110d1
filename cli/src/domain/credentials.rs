//! Service key records and the credential map they carry.

use serde::Deserialize;

/// Broker-defined connection details (host, port, uri, ...).
pub type Credentials = serde_json::Map<String, serde_json::Value>;

/// Name of the service key issued to read an instance's credentials.
pub const SERVICE_KEY_NAME: &str = "test-credentials";

/// Exit code `cf curl --fail` uses to report an HTTP error response.
///
/// Other non-zero codes from `cf curl` accompany successful responses and
/// must not be treated as failures.
pub const CURL_HTTP_ERROR_EXIT_CODE: i32 = 22;

#[derive(Deserialize)]
struct KeyRecord {
    entity: KeyEntity,
}

#[derive(Deserialize)]
struct KeyEntity {
    credentials: Credentials,
}

/// Decode a `/v2/service_keys/<guid>` document into its credential map.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or `entity.credentials` is
/// missing or not an object.
pub fn decode_key_record(body: &[u8]) -> Result<Credentials, serde_json::Error> {
    serde_json::from_slice::<KeyRecord>(body).map(|record| record.entity.credentials)
}
