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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueMap, ValueString};
use tf_provider::{
    map, Attribute, AttributeConstraint, AttributePath, AttributeType, Block, Description,
    Diagnostics, Schema,
};

use crate::ids::ResourceKind;
use crate::resourceids::{ParsedResourceId, ResourceIdError};
use crate::utils::{DisplayJoinable, ValueExt, WithSchema, WithValidate};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResourceIdState<'a> {
    #[serde(borrow = "'a")]
    pub input: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub resource_type: ValueString<'a>,
    pub case_insensitive: Value<bool>,
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub description: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub segments: ValueMap<'a, ValueString<'a>>,
}

impl<'a> WithSchema for ResourceIdState<'a> {
    fn schema() -> Schema {
        let kinds = ResourceKind::ALL.iter().join_with(", ").to_string();
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "input" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Resource ID to parse"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "resource_type" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!("Expected type of the ID, one of: {kinds}")),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "case_insensitive" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Accept fixed segments in any casing (default false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Normalized resource ID"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "description" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Human readable description of the ID"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "segments" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("User supplied segment values, by segment name"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Parse and normalize an Azure resource ID"),
                ..Default::default()
            },
        }
    }
}

impl<'a> ResourceIdState<'a> {
    /// Resource kind, if known and valid
    pub(super) fn kind(&self) -> Option<Result<ResourceKind, String>> {
        let Value::Value(resource_type) = &self.resource_type else {
            return None;
        };
        Some(resource_type.parse::<ResourceKind>().map_err(|err| {
            format!(
                "{err}, expected one of: {}",
                ResourceKind::ALL.iter().join_with(", ")
            )
        }))
    }

    pub(super) fn parse(&self, kind: ResourceKind) -> Option<Result<ParsedResourceId, ResourceIdError>> {
        let Value::Value(input) = &self.input else {
            return None;
        };
        Some(kind.parse(input, self.case_insensitive.known_or(false)))
    }

    pub(super) fn fill(&mut self, parsed: ParsedResourceId) {
        self.id = Value::Value(Cow::Owned(parsed.id));
        self.description = Value::Value(Cow::Owned(parsed.description));
        self.segments = Value::Value(
            parsed
                .segments
                .into_iter()
                .map(|(name, value)| (Cow::Owned(name), Value::Value(Cow::Owned(value))))
                .collect(),
        );
    }
}

#[async_trait]
impl<'a> WithValidate for ResourceIdState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        let kind = match self.kind() {
            Some(Ok(kind)) => kind,
            Some(Err(err)) => {
                diags.error(
                    "Invalid resource type",
                    err,
                    attr_path.clone().attribute("resource_type"),
                );
                return;
            }
            None => return,
        };
        if let Some(Err(err)) = self.parse(kind) {
            diags.error(
                "Invalid resource ID",
                err.to_string(),
                attr_path.attribute("input"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn state(input: &str, resource_type: &str) -> ResourceIdState<'static> {
        ResourceIdState {
            input: Value::Value(Cow::Owned(input.to_owned())),
            resource_type: Value::Value(Cow::Owned(resource_type.to_owned())),
            ..Default::default()
        }
    }

    const SERVER: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/servers/server1";

    #[test]
    fn unknown_kind() {
        let err = state(SERVER, "sql_server").kind().unwrap().unwrap_err();
        assert!(err.starts_with("unknown resource type \"sql_server\""), "{err}");
        assert!(err.contains("mssql_server"), "{err}");
        assert!(ResourceIdState::default().kind().is_none());
    }

    #[test]
    fn fills_outputs() {
        let mut state = state(SERVER, "mssql_server");
        let parsed = state.parse(ResourceKind::MssqlServer).unwrap().unwrap();
        state.fill(parsed);
        assert_eq!(state.id.as_str(), SERVER);
        let segments = match &state.segments {
            Value::Value(segments) => segments,
            _ => panic!("segments should be known"),
        };
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments.get("serverName").and_then(|value| value.as_deref_option()),
            Some("server1")
        );
    }

    #[test]
    fn insensitive_parsing_is_opt_in() {
        let lowered = SERVER.to_lowercase();
        let mut state = state(&lowered, "mssql_server");
        assert!(state.parse(ResourceKind::MssqlServer).unwrap().is_err());

        state.case_insensitive = Value::Value(true);
        let parsed = state.parse(ResourceKind::MssqlServer).unwrap().unwrap();
        assert_eq!(
            parsed.id,
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/servers/server1"
        );
    }

    #[tokio::test]
    async fn validation_reports_attribute() {
        let mut diags = Diagnostics::default();
        state("/subscriptions/sub", "mssql_server")
            .validate(&mut diags, AttributePath::default())
            .await;
        assert_eq!(diags.errors.len(), 1);

        let mut diags = Diagnostics::default();
        let mut unknown = state(SERVER, "mssql_server");
        unknown.input = Value::Unknown;
        unknown.validate(&mut diags, AttributePath::default()).await;
        assert!(diags.errors.is_empty());
    }
}
