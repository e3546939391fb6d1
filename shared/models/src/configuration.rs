//! Email delivery settings maintained by the operator in the document store.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SMTP settings record, stored under a fixed key.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfiguration {
    pub email_host: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub email_port: u16,
    pub sender_email_user: String,
    pub sender_email_pass: String,
    /// `false` accepts self-signed or otherwise invalid server certificates.
    #[serde(default = "default_reject_unauthorized")]
    pub reject_unauthorized: bool,
    pub email_subject: String,
    /// One address, or several separated by commas.
    pub recipient_email: String,
}

fn default_reject_unauthorized() -> bool {
    true
}

/// Accepts the port as an integer, an integral float (`587.0`) or a numeric
/// string (`"587"`), since records written by JS tooling store any of these.
pub fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortVisitor;

    impl<'de> Visitor<'de> for PortVisitor {
        type Value = u16;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a port number between 0 and 65535")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} out of range", value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u16::try_from(value).map_err(|_| E::custom(format!("port {} out of range", value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value.fract() != 0.0 || !(0.0..=f64::from(u16::MAX)).contains(&value) {
                return Err(E::invalid_value(de::Unexpected::Float(value), &self));
            }
            Ok(value as u16)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse::<u16>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

impl EmailConfiguration {
    pub fn recipients(&self) -> Vec<&str> {
        self.recipient_email
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .collect()
    }
}

impl fmt::Debug for EmailConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfiguration")
            .field("email_host", &self.email_host)
            .field("email_port", &self.email_port)
            .field("sender_email_user", &self.sender_email_user)
            .field("sender_email_pass", &"<redacted>")
            .field("reject_unauthorized", &self.reject_unauthorized)
            .field("email_subject", &self.email_subject)
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}
