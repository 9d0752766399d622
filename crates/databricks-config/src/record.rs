//! Databricks credential record
//!
//! This module provides the DatabricksConfig type, a plain value object holding
//! everything needed to authenticate against a Databricks workspace. Records are
//! produced by credential sources and consumed by API clients; a record carries
//! no knowledge of where its values came from.

use serde::{Deserialize, Serialize};

/// A set of credentials for one Databricks workspace
///
/// Every field is optional. A record is only usable once it satisfies one of
/// the validity predicates: host plus token, or host plus username and
/// password. Fields set to an empty string count as present for validity
/// checks, mirroring how environment variables behave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabricksConfig {
    /// Workspace URL, e.g. "https://acme.cloud.databricks.com"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Username for basic authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Personal access token or OAuth access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Refresh token paired with an OAuth access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Whether TLS verification should be skipped, stored as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<String>,

    /// Jobs API version to target, e.g. "2.1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_api_version: Option<String>,
}

impl DatabricksConfig {
    /// Create a record for token authentication
    pub fn from_token(
        host: Option<String>,
        token: Option<String>,
        refresh_token: Option<String>,
        insecure: Option<String>,
        jobs_api_version: Option<String>,
    ) -> Self {
        Self {
            host,
            token,
            refresh_token,
            insecure,
            jobs_api_version,
            ..Self::default()
        }
    }

    /// Create a record for username and password authentication
    pub fn from_password(
        host: Option<String>,
        username: Option<String>,
        password: Option<String>,
        insecure: Option<String>,
        jobs_api_version: Option<String>,
    ) -> Self {
        Self {
            host,
            username,
            password,
            insecure,
            jobs_api_version,
            ..Self::default()
        }
    }

    /// Create a record with no fields set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether token authentication is possible
    pub fn is_valid_with_token(&self) -> bool {
        self.host.is_some() && self.token.is_some()
    }

    /// Check whether basic authentication is possible
    pub fn is_valid_with_password(&self) -> bool {
        self.host.is_some() && self.username.is_some() && self.password.is_some()
    }

    /// Check whether the record supports at least one authentication method
    pub fn is_valid(&self) -> bool {
        self.is_valid_with_token() || self.is_valid_with_password()
    }
}
