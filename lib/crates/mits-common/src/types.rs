use serde::{Deserialize, Serialize};

/// Backing-service families exercised by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[cfg_attr(feature = "clap", value(name = "mariadb"))]
    MariaDb,
    #[cfg_attr(feature = "clap", value(name = "mysql"))]
    MySql,
    #[cfg_attr(feature = "clap", value(name = "postgresql"))]
    PostgreSql,
    #[cfg_attr(feature = "clap", value(name = "redis"))]
    Redis,
    #[cfg_attr(feature = "clap", value(name = "mongodb"))]
    MongoDb,
    #[cfg_attr(feature = "clap", value(name = "rabbitmq"))]
    RabbitMq,
}

impl Backend {
    /// Every backend, in the order scenarios are reported.
    pub const ALL: [Backend; 6] = [
        Backend::MariaDb,
        Backend::MySql,
        Backend::PostgreSql,
        Backend::Redis,
        Backend::MongoDb,
        Backend::RabbitMq,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::MariaDb => "mariadb",
            Backend::MySql => "mysql",
            Backend::PostgreSql => "postgresql",
            Backend::Redis => "redis",
            Backend::MongoDb => "mongodb",
            Backend::RabbitMq => "rabbitmq",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
