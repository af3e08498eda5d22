//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Zid Value Formats
//!
//! Semantic format tags accepted by the `Format` validation and the checks
//! applied to string values carrying them.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZiCFormat {
    Date,
    DateTime,
    Uuid,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Ip,
    Uri,
    Mac,
    Cidr,
    Regexp,
    Json,
    Rfc1123,
}

static UUID_RE: OnceLock<Option<Regex>> = OnceLock::new();
static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static HOSTNAME_RE: OnceLock<Option<Regex>> = OnceLock::new();
static URI_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MAC_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    compiled(cell, pattern).map(|re| re.is_match(value)).unwrap_or(false)
}

impl ZiCFormat {
    pub const ALL: [ZiCFormat; 14] = [
        ZiCFormat::Date,
        ZiCFormat::DateTime,
        ZiCFormat::Uuid,
        ZiCFormat::Email,
        ZiCFormat::Hostname,
        ZiCFormat::Ipv4,
        ZiCFormat::Ipv6,
        ZiCFormat::Ip,
        ZiCFormat::Uri,
        ZiCFormat::Mac,
        ZiCFormat::Cidr,
        ZiCFormat::Regexp,
        ZiCFormat::Json,
        ZiCFormat::Rfc1123,
    ];

    #[allow(non_snake_case)]
    pub fn ZiFName(&self) -> &'static str {
        match self {
            ZiCFormat::Date => "date",
            ZiCFormat::DateTime => "date-time",
            ZiCFormat::Uuid => "uuid",
            ZiCFormat::Email => "email",
            ZiCFormat::Hostname => "hostname",
            ZiCFormat::Ipv4 => "ipv4",
            ZiCFormat::Ipv6 => "ipv6",
            ZiCFormat::Ip => "ip",
            ZiCFormat::Uri => "uri",
            ZiCFormat::Mac => "mac",
            ZiCFormat::Cidr => "cidr",
            ZiCFormat::Regexp => "regexp",
            ZiCFormat::Json => "json",
            ZiCFormat::Rfc1123 => "rfc1123",
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFParse(name: &str) -> Option<ZiCFormat> {
        ZiCFormat::ALL.iter().copied().find(|f| f.ZiFName() == name)
    }

    /// Checks `value` against the format, describing the mismatch on failure.
    #[allow(non_snake_case)]
    pub fn ZiFCheck(&self, value: &str) -> std::result::Result<(), String> {
        let ok = match self {
            ZiCFormat::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            ZiCFormat::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            ZiCFormat::Rfc1123 => DateTime::parse_from_rfc2822(value).is_ok(),
            ZiCFormat::Uuid => matches(
                &UUID_RE,
                r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
                value,
            ),
            ZiCFormat::Email => matches(&EMAIL_RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$", value),
            ZiCFormat::Hostname => {
                value.len() <= 253
                    && matches(
                        &HOSTNAME_RE,
                        r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$",
                        value,
                    )
            }
            ZiCFormat::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            ZiCFormat::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
            ZiCFormat::Ip => value.parse::<IpAddr>().is_ok(),
            ZiCFormat::Uri => matches(&URI_RE, r"^[A-Za-z][A-Za-z0-9+.\-]*:\S*$", value),
            ZiCFormat::Mac => matches(&MAC_RE, r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$", value),
            ZiCFormat::Cidr => check_cidr(value),
            ZiCFormat::Regexp => Regex::new(value).is_ok(),
            ZiCFormat::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("invalid {} value", self.ZiFName()))
        }
    }
}

fn check_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}
