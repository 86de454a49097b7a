//! Connection Configuration
//!
//! Connection parameters are read once at startup and assembled into a
//! single ODBC connection string. An explicit `AS400_CONNECTION_STRING`
//! always wins; otherwise the string is built from a DSN or a host name
//! plus credentials.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{parse_bool, ConfigError};

/// Placeholder substituted for credential values in diagnostics
pub const MASK: &str = "****";

/// Driver used when the string is assembled from `AS400_HOST`
pub const DEFAULT_DRIVER: &str = "IBM i Access ODBC Driver";

/// Backing-store connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Complete ODBC connection string (`AS400_CONNECTION_STRING`)
    pub connection_string: Option<String>,
    /// Pre-registered data source name (`AS400_DSN`)
    pub dsn: Option<String>,
    /// System host name (`AS400_HOST`)
    pub host: Option<String>,
    /// ODBC driver name used together with `host` (`AS400_DRIVER`)
    pub driver: String,
    /// User profile (`AS400_USER`)
    pub user: Option<String>,
    /// Password (`AS400_PASSWORD`)
    pub password: Option<String>,
    /// Whether each statement commits immediately (`AS400_AUTOCOMMIT`)
    pub autocommit: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            dsn: None,
            host: None,
            driver: DEFAULT_DRIVER.to_string(),
            user: None,
            password: None,
            autocommit: true,
        }
    }
}

impl ConnectionConfig {
    /// Config backed by a complete connection string
    pub fn from_connection_string(conn_str: impl Into<String>) -> Self {
        Self {
            connection_string: Some(conn_str.into()),
            ..Default::default()
        }
    }

    /// Read connection settings through `lookup` (usually the process environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let autocommit = match get("AS400_AUTOCOMMIT") {
            Some(raw) => parse_bool("AS400_AUTOCOMMIT", &raw)?,
            None => true,
        };

        Ok(Self {
            connection_string: get("AS400_CONNECTION_STRING"),
            dsn: get("AS400_DSN"),
            host: get("AS400_HOST"),
            driver: get("AS400_DRIVER").unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
            user: get("AS400_USER"),
            // Kept verbatim, surrounding whitespace included
            password: lookup("AS400_PASSWORD").filter(|v| !v.is_empty()),
            autocommit,
        })
    }

    /// Assemble the ODBC connection string, or `None` when nothing is configured
    pub fn connection_string(&self) -> Option<String> {
        if let Some(conn_str) = &self.connection_string {
            return Some(conn_str.clone());
        }

        let mut fields = Vec::new();
        if let Some(dsn) = &self.dsn {
            fields.push(format!("DSN={}", dsn));
        } else if let Some(host) = &self.host {
            fields.push(format!("DRIVER={{{}}}", self.driver));
            fields.push(format!("SYSTEM={}", host));
        } else {
            return None;
        }
        if let Some(user) = &self.user {
            fields.push(format!("UID={}", braced(user)));
        }
        if let Some(password) = &self.password {
            fields.push(format!("PWD={}", braced(password)));
        }

        Some(format!("{};", fields.join(";")))
    }

    /// Whether enough settings are present to attempt a connection
    pub fn is_configured(&self) -> bool {
        self.connection_string.is_some() || self.dsn.is_some() || self.host.is_some()
    }

    /// The assembled connection string with credentials masked, for logging
    pub fn masked(&self) -> String {
        self.connection_string()
            .map(|s| mask_credentials(&s))
            .unwrap_or_default()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("connection_string", &self.connection_string.as_deref().map(mask_credentials))
            .field("dsn", &self.dsn)
            .field("host", &self.host)
            .field("driver", &self.driver)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| MASK))
            .field("autocommit", &self.autocommit)
            .finish()
    }
}

/// Quote an attribute value as `{...}`, doubling any closing brace, so that
/// `;` and `}` inside it cannot end the attribute early
fn braced(value: &str) -> String {
    format!("{{{}}}", value.replace('}', "}}"))
}

fn credential_field() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(PWD|PASSWORD)(\s*=\s*)(\{(?:[^}]|\}\})*\}|[^;]*)")
            .expect("credential pattern is valid")
    })
}

/// Replace every `PWD=`/`PASSWORD=` value in `text` with [`MASK`]
///
/// The keyword is matched case-insensitively and keeps its original
/// spelling. A braced value runs to its closing `}` (with `}}` as an escaped
/// brace) and is masked whole, `;` included; a bare value runs up to the next
/// `;` or the end of the text.
pub fn mask_credentials(text: &str) -> String {
    credential_field()
        .replace_all(text, format!("${{1}}${{2}}{}", MASK).as_str())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_mask_is_case_insensitive() {
        assert_eq!(
            mask_credentials("DSN=PROD;UID=ops;PWD=s3cret;"),
            "DSN=PROD;UID=ops;PWD=****;"
        );
        assert_eq!(
            mask_credentials("dsn=prod;uid=ops;pwd=s3cret"),
            "dsn=prod;uid=ops;pwd=****"
        );
        assert_eq!(
            mask_credentials("SYSTEM=h;Password = hunter2;NAM=1"),
            "SYSTEM=h;Password = ****;NAM=1"
        );
    }

    #[test]
    fn test_mask_leaves_other_fields() {
        let s = "DRIVER={IBM i Access ODBC Driver};SYSTEM=as400;UID=ops;";
        assert_eq!(mask_credentials(s), s);
    }

    #[test]
    fn test_explicit_string_wins() {
        let config = ConnectionConfig::from_lookup(lookup(&[
            ("AS400_CONNECTION_STRING", "DSN=A;PWD=x;"),
            ("AS400_DSN", "B"),
        ]))
        .unwrap();
        assert_eq!(config.connection_string().as_deref(), Some("DSN=A;PWD=x;"));
        assert_eq!(config.masked(), "DSN=A;PWD=****;");
    }

    #[test]
    fn test_dsn_fields_assembled() {
        let config = ConnectionConfig::from_lookup(lookup(&[
            ("AS400_DSN", "PROD"),
            ("AS400_USER", "ops"),
            ("AS400_PASSWORD", "pw"),
        ]))
        .unwrap();
        assert_eq!(
            config.connection_string().as_deref(),
            Some("DSN=PROD;UID={ops};PWD={pw};")
        );
        assert_eq!(config.masked(), "DSN=PROD;UID={ops};PWD=****;");
    }

    #[test]
    fn test_password_with_separator_is_quoted_and_masked() {
        let config = ConnectionConfig::from_lookup(lookup(&[
            ("AS400_DSN", "PROD"),
            ("AS400_USER", "ops"),
            ("AS400_PASSWORD", "ab;cd}SECRET"),
        ]))
        .unwrap();
        assert_eq!(
            config.connection_string().as_deref(),
            Some("DSN=PROD;UID={ops};PWD={ab;cd}}SECRET};")
        );
        let masked = config.masked();
        assert_eq!(masked, "DSN=PROD;UID={ops};PWD=****;");
        assert!(!masked.contains("SECRET"));
    }

    #[test]
    fn test_mask_braced_value() {
        assert_eq!(
            mask_credentials("DSN=PROD;PWD={a;b};NAM=1"),
            "DSN=PROD;PWD=****;NAM=1"
        );
        assert_eq!(
            mask_credentials("password={x}};y;z}"),
            "password=****"
        );
    }

    #[test]
    fn test_host_fields_assembled_with_driver() {
        let config = ConnectionConfig::from_lookup(lookup(&[
            ("AS400_HOST", "as400.local"),
            ("AS400_USER", "ops"),
        ]))
        .unwrap();
        assert_eq!(
            config.connection_string().as_deref(),
            Some("DRIVER={IBM i Access ODBC Driver};SYSTEM=as400.local;UID={ops};")
        );
    }

    #[test]
    fn test_unconfigured() {
        let config = ConnectionConfig::from_lookup(lookup(&[("AS400_USER", "ops")])).unwrap();
        assert!(!config.is_configured());
        assert_eq!(config.connection_string(), None);
        assert_eq!(config.masked(), "");
        assert!(config.autocommit);
    }

    #[test]
    fn test_autocommit_flag() {
        let config = ConnectionConfig::from_lookup(lookup(&[("AS400_AUTOCOMMIT", "off")])).unwrap();
        assert!(!config.autocommit);
        assert!(ConnectionConfig::from_lookup(lookup(&[("AS400_AUTOCOMMIT", "maybe")])).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ConnectionConfig {
            host: Some("h".into()),
            password: Some("topsecret".into()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("topsecret"));
    }
}
