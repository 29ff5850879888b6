// This file is part of the terraform-provider-azurerm project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::{map, Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use url::Url;

use crate::utils::{known_str, WithSchema};

pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com/";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// `provider "azurerm"` block
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub subscription_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub access_token: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub resource_manager_endpoint: ValueString<'a>,
    pub max_retries: ValueNumber,
}

impl<'a> WithSchema for ProviderConfig<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "subscription_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Expected subscription of managed resources, mismatches are reported as warnings (falls back to ARM_SUBSCRIPTION_ID)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "access_token" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Bearer token for Azure Resource Manager (falls back to ARM_ACCESS_TOKEN)"),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "resource_manager_endpoint" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Azure Resource Manager endpoint (falls back to ARM_RESOURCE_MANAGER_ENDPOINT)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "max_retries" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Retries of throttled or failed requests (falls back to ARM_MAX_RETRIES)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("Azure Resource Manager"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no access token: set `access_token` or ARM_ACCESS_TOKEN")]
    MissingAccessToken,

    #[error("invalid resource manager endpoint {value:?}: {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid max_retries {0:?}: expected a non-negative integer")]
    InvalidMaxRetries(String),
}

impl ConfigError {
    /// Attribute of the provider block the error relates to
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::MissingAccessToken => "access_token",
            Self::InvalidEndpoint { .. } => "resource_manager_endpoint",
            Self::InvalidMaxRetries(_) => "max_retries",
        }
    }
}

/// Resolved settings of the ARM client
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub subscription_id: Option<String>,
    pub access_token: String,
    pub endpoint: Url,
    pub max_retries: u32,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("subscription_id", &self.subscription_id)
            .field("access_token", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ClientConfig {
    /// Resolve the provider block, falling back on `env` for every unset attribute
    pub fn resolve<F>(config: &ProviderConfig<'_>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |value: &ValueString<'_>, var: &str| -> Option<String> {
            known_str(value)
                .map(str::to_owned)
                .or_else(|| env(var).filter(|value| !value.is_empty()))
        };

        let subscription_id = lookup(&config.subscription_id, "ARM_SUBSCRIPTION_ID");
        let access_token =
            lookup(&config.access_token, "ARM_ACCESS_TOKEN").ok_or(ConfigError::MissingAccessToken)?;

        let endpoint = lookup(
            &config.resource_manager_endpoint,
            "ARM_RESOURCE_MANAGER_ENDPOINT",
        )
        .unwrap_or_else(|| DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_owned());
        let endpoint = parse_endpoint(&endpoint)?;

        let max_retries = match &config.max_retries {
            Value::Value(value) => u32::try_from(*value)
                .map_err(|_| ConfigError::InvalidMaxRetries(value.to_string()))?,
            _ => match env("ARM_MAX_RETRIES").filter(|value| !value.is_empty()) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidMaxRetries(value))?,
                None => DEFAULT_MAX_RETRIES,
            },
        };

        Ok(Self {
            subscription_id,
            access_token,
            endpoint,
            max_retries,
        })
    }

    pub fn from_env(config: &ProviderConfig<'_>) -> Result<Self, ConfigError> {
        Self::resolve(config, |var| std::env::var(var).ok())
    }
}

/// The endpoint is a base for relative joins, so it must end with a slash
fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let normalized: Cow<str> = if value.ends_with('/') {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{value}/"))
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidEndpoint {
        value: value.to_owned(),
        source,
    })
}
