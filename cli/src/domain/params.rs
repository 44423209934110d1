//! Provisioning parameters sent with `cf create-service -c`.

use mits_common::Backend;
use serde_json::{Value, json};

use crate::domain::names::prefixed_random_name;

/// Encode parameters for the broker.
///
/// `None` means "no parameters supplied" and yields `None`, so the caller
/// omits the `-c` flag entirely. `Some({})` is kept as the literal `{}`.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn encode_parameters(params: Option<&Value>) -> Result<Option<String>, serde_json::Error> {
    params.map(serde_json::to_string).transpose()
}

/// Parameters each backend scenario provisions with.
///
/// When the broker overrides parameters itself, backends whose parameters
/// are optional send none. Redis and MariaDB always send theirs.
#[must_use]
pub fn provisioning_parameters(backend: Backend, class: &str, override_params: bool) -> Option<Value> {
    let db = || prefixed_random_name(class, "db");
    let user = || prefixed_random_name(class, "user");
    match backend {
        Backend::Redis => Some(json!({ "cluster": { "enabled": false } })),
        Backend::MariaDb => Some(json!({ "db": { "name": db(), "user": user() } })),
        _ if override_params => None,
        Backend::MySql => Some(json!({ "mysqlDatabase": db(), "mysqlUser": user() })),
        Backend::PostgreSql => Some(json!({
            "postgresqlDatabase": db(),
            "postgresqlUsername": user(),
        })),
        Backend::MongoDb => Some(json!({ "mongodbDatabase": db(), "mongodbUsername": user() })),
        Backend::RabbitMq => Some(json!({ "rabbitmq": { "username": user() } })),
    }
}
