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

//! Typed resource IDs, and a registry mapping their Terraform-facing names to parsers.

use std::fmt::Display;
use std::str::FromStr;

use crate::resourceids::{ParsedResourceId, ResourceId, ResourceIdError};

pub mod apimanagement;
pub mod common;
pub mod logic;
pub mod machinelearning;
pub mod mssql;
pub mod policy;

macro_rules! resource_kinds {
    ($( $variant:ident => $name:literal : $parse:expr ),+ $(,)?) => {
        /// Every ID type that can be parsed by name
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResourceKind {
            $( $variant, )+
        }

        impl ResourceKind {
            pub const ALL: &'static [ResourceKind] = &[$( ResourceKind::$variant, )+];

            pub fn name(&self) -> &'static str {
                match self {
                    $( ResourceKind::$variant => $name, )+
                }
            }

            /// Parse `input` as an ID of this kind.
            ///
            /// `insensitively` only applies to grammar based IDs: the legacy
            /// parsers already tolerate the casing the API returns.
            pub fn parse(
                &self,
                input: &str,
                insensitively: bool,
            ) -> Result<ParsedResourceId, ResourceIdError> {
                let parse: fn(&str, bool) -> Result<ParsedResourceId, ResourceIdError> = match self {
                    $( ResourceKind::$variant => $parse, )+
                };
                parse(input, insensitively)
            }
        }

        impl FromStr for ResourceKind {
            type Err = UnknownResourceKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(ResourceKind::$variant), )+
                    _ => Err(UnknownResourceKind(s.to_owned())),
                }
            }
        }
    };
}

fn typed<T: ResourceId>(input: &str, insensitively: bool) -> Result<ParsedResourceId, ResourceIdError> {
    T::parse_with(input, insensitively).map(|id| ParsedResourceId::from_typed(&id))
}

resource_kinds! {
    Subscription => "subscription": typed::<common::SubscriptionId>,
    ResourceGroup => "resource_group": typed::<common::ResourceGroupId>,
    ApiManagement => "api_management": typed::<apimanagement::ServiceId>,
    ApiManagementApi => "api_management_api": typed::<apimanagement::ApiId>,
    ApiManagementApiTagDescription => "api_management_api_tag_description": typed::<apimanagement::ApiTagDescriptionsId>,
    MssqlServer => "mssql_server": typed::<mssql::ServerId>,
    MssqlDatabase => "mssql_database": typed::<mssql::DatabaseId>,
    MssqlJobAgent => "mssql_job_agent": typed::<mssql::JobAgentId>,
    MssqlJob => "mssql_job": typed::<mssql::JobId>,
    MssqlJobExecution => "mssql_job_execution": typed::<mssql::JobExecutionId>,
    MssqlJobStepExecution => "mssql_job_step_execution": typed::<mssql::JobStepExecutionId>,
    MssqlRestorableDroppedDatabase => "mssql_restorable_dropped_database": |input, _| {
        mssql::RestorableDroppedDatabaseId::parse(input).map(|id| ParsedResourceId::from(&id))
    },
    MachineLearningWorkspace => "machine_learning_workspace": typed::<machinelearning::WorkspaceId>,
    MachineLearningCompute => "machine_learning_compute": typed::<machinelearning::ComputeId>,
    LogicAppWorkflow => "logic_app_workflow": typed::<logic::WorkflowId>,
    LogicAppWorkflowRunAction => "logic_app_workflow_run_action": typed::<logic::WorkflowRunActionId>,
    PolicyExemption => "policy_exemption": typed::<policy::PolicyExemptionId>,
    ResourcePolicyExemption => "resource_policy_exemption": |input, _| {
        policy::ResourcePolicyExemptionId::parse(input).map(|id| ParsedResourceId::from(&id))
    },
    ResourcePolicyRemediation => "resource_policy_remediation": |input, _| {
        policy::ResourcePolicyRemediationId::parse(input).map(|id| ParsedResourceId::from(&id))
    },
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type {0:?}")]
pub struct UnknownResourceKind(pub String);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.name().parse::<ResourceKind>(), Ok(*kind));
        }
        assert_eq!(
            "mssql_nope".parse::<ResourceKind>(),
            Err(UnknownResourceKind("mssql_nope".to_owned()))
        );
    }

    #[test]
    fn parse_by_kind() {
        let parsed = ResourceKind::MssqlJobAgent
            .parse(
                "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Sql/servers/server1/jobAgents/agent1",
                false,
            )
            .unwrap();
        assert_eq!(parsed.segments["jobAgentName"], "agent1");
        assert_eq!(parsed.segments["serverName"], "server1");
        assert!(!parsed.segments.contains_key("staticJobAgents"));
        assert!(parsed.description.starts_with("Job Agent ("));

        let lower = "/subscriptions/sub1/resourcegroups/group1/providers/microsoft.sql/servers/server1/jobagents/agent1";
        assert!(ResourceKind::MssqlJobAgent.parse(lower, false).is_err());
        assert_eq!(
            ResourceKind::MssqlJobAgent.parse(lower, true).unwrap().id,
            parsed.id
        );
    }

    #[test]
    fn legacy_kinds() {
        let parsed = ResourceKind::MssqlRestorableDroppedDatabase
            .parse(
                "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Sql/servers/server1/restorabledroppeddatabases/db1,42",
                false,
            )
            .unwrap();
        assert_eq!(
            parsed.id,
            "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Sql/servers/server1/restorableDroppedDatabases/db1,42"
        );
        assert_eq!(parsed.segments["deletionTime"], "42");
    }
}
