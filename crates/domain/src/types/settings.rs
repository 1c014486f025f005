//! Keys of the external settings store

/// Fields the network core reads from and writes to the settings store
///
/// Every key is independently nullable; the store decides defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    EndpointHost,
    EndpointPort,
    Username,
    Password,
    Token,
    TokenExpiry,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::EndpointHost,
        ConfigKey::EndpointPort,
        ConfigKey::Username,
        ConfigKey::Password,
        ConfigKey::Token,
        ConfigKey::TokenExpiry,
    ];

    /// Storage key name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndpointHost => "ip",
            Self::EndpointPort => "port",
            Self::Username => "username",
            Self::Password => "password",
            Self::Token => "token",
            Self::TokenExpiry => "tokenExpiry",
        }
    }

    /// Whether the value must be kept out of logs
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Password | Self::Token)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
