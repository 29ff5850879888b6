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

use std::collections::BTreeMap;
use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

use crate::resourceids::legacy::AzureResourceId;
use crate::resourceids::{resource_id, ParsedResourceId, ResourceIdError, Segment};

resource_id! {
    pub struct ServerId("Server") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
    ];
}

resource_id! {
    pub struct DatabaseId("Database") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
        database_name: "databaseName" => "Database Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
        Segment::static_segment("staticDatabases", "databases"),
        Segment::user_specified("databaseName", "databaseValue"),
    ];
}

resource_id! {
    /// An elastic job agent hosted on a SQL server
    pub struct JobAgentId("Job Agent") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
        job_agent_name: "jobAgentName" => "Job Agent Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
        Segment::static_segment("staticJobAgents", "jobAgents"),
        Segment::user_specified("jobAgentName", "jobAgentValue"),
    ];
}

resource_id! {
    pub struct JobId("Job") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
        job_agent_name: "jobAgentName" => "Job Agent Name",
        job_name: "jobName" => "Job Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
        Segment::static_segment("staticJobAgents", "jobAgents"),
        Segment::user_specified("jobAgentName", "jobAgentValue"),
        Segment::static_segment("staticJobs", "jobs"),
        Segment::user_specified("jobName", "jobValue"),
    ];
}

impl JobId {
    pub fn execution(&self, job_execution_id: impl Into<String>) -> JobExecutionId {
        JobExecutionId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.server_name.as_str(),
            self.job_agent_name.as_str(),
            self.job_name.as_str(),
            job_execution_id,
        )
    }
}

resource_id! {
    /// A single run of an elastic job
    pub struct JobExecutionId("Job Execution") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
        job_agent_name: "jobAgentName" => "Job Agent Name",
        job_name: "jobName" => "Job Name",
        job_execution_id: "jobExecutionId" => "Job Execution",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
        Segment::static_segment("staticJobAgents", "jobAgents"),
        Segment::user_specified("jobAgentName", "jobAgentValue"),
        Segment::static_segment("staticJobs", "jobs"),
        Segment::user_specified("jobName", "jobValue"),
        Segment::static_segment("staticExecutions", "executions"),
        Segment::user_specified("jobExecutionId", "jobExecutionIdValue"),
    ];
}

impl JobExecutionId {
    pub fn job_id(&self) -> JobId {
        JobId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.server_name.as_str(),
            self.job_agent_name.as_str(),
            self.job_name.as_str(),
        )
    }
}

resource_id! {
    /// The execution of one step within a job execution
    pub struct JobStepExecutionId("Job Step Execution") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        server_name: "serverName" => "Server Name",
        job_agent_name: "jobAgentName" => "Job Agent Name",
        job_name: "jobName" => "Job Name",
        job_execution_id: "jobExecutionId" => "Job Execution",
        step_name: "stepName" => "Step Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSql", "Microsoft.Sql"),
        Segment::static_segment("staticServers", "servers"),
        Segment::user_specified("serverName", "serverValue"),
        Segment::static_segment("staticJobAgents", "jobAgents"),
        Segment::user_specified("jobAgentName", "jobAgentValue"),
        Segment::static_segment("staticJobs", "jobs"),
        Segment::user_specified("jobName", "jobValue"),
        Segment::static_segment("staticExecutions", "executions"),
        Segment::user_specified("jobExecutionId", "jobExecutionIdValue"),
        Segment::static_segment("staticSteps", "steps"),
        Segment::user_specified("stepName", "stepValue"),
    ];
}

lazy_static! {
    static ref RESTORABLE_DROPPED_DATABASE_NAME: Regex = Regex::new(r"^(.+),(\d+)$").unwrap();
}

/// A dropped database that can still be restored.
///
/// The API names these `{database},{deletion time}` and is not consistent in
/// the casing of the `restorableDroppedDatabases` key, so this ID is parsed by
/// hand and casing of that key is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RestorableDroppedDatabaseId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub server_name: String,
    pub database_name: String,
    /// Deletion time, as Windows file time ticks
    pub deletion_time: String,
}

impl RestorableDroppedDatabaseId {
    pub const ID_TYPE: &'static str = "Restorable Dropped Database";

    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        server_name: impl Into<String>,
        database_name: impl Into<String>,
        deletion_time: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            server_name: server_name.into(),
            database_name: database_name.into(),
            deletion_time: deletion_time.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let mut id = AzureResourceId::parse(Self::ID_TYPE, input)?;
        if id.resource_group.is_empty() {
            return Err(ResourceIdError::malformed(
                Self::ID_TYPE,
                input,
                "ID was missing the `resourceGroups` element",
            ));
        }
        if !id.provider.eq_ignore_ascii_case("Microsoft.Sql") {
            return Err(ResourceIdError::malformed(
                Self::ID_TYPE,
                input,
                format!("expected the provider `Microsoft.Sql` but got {:?}", id.provider),
            ));
        }

        let server_name = id.pop_segment("servers")?;
        let name = id.pop_segment_insensitively("restorableDroppedDatabases")?;
        id.validate_no_remaining_segments()?;

        let captures = RESTORABLE_DROPPED_DATABASE_NAME
            .captures(&name)
            .ok_or_else(|| {
                ResourceIdError::malformed(
                    Self::ID_TYPE,
                    input,
                    format!("expected the name {name:?} to be formatted as `{{database}},{{deletion time}}`"),
                )
            })?;

        Ok(Self {
            subscription_id: id.subscription_id,
            resource_group_name: id.resource_group,
            server_name,
            database_name: captures[1].to_owned(),
            deletion_time: captures[2].to_owned(),
        })
    }

    pub fn name(&self) -> String {
        format!("{},{}", self.database_name, self.deletion_time)
    }

    pub fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Sql/servers/{}/restorableDroppedDatabases/{}",
            self.subscription_id,
            self.resource_group_name,
            self.server_name,
            self.name()
        )
    }

    pub fn server_id(&self) -> ServerId {
        ServerId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.server_name.as_str(),
        )
    }
}

impl Display for RestorableDroppedDatabaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Subscription: {:?} / Resource Group Name: {:?} / Server Name: {:?} / Name: {:?})",
            Self::ID_TYPE,
            self.subscription_id,
            self.resource_group_name,
            self.server_name,
            self.name()
        )
    }
}

impl From<&RestorableDroppedDatabaseId> for ParsedResourceId {
    fn from(value: &RestorableDroppedDatabaseId) -> Self {
        Self {
            id: value.id(),
            description: value.to_string(),
            segments: BTreeMap::from([
                ("subscriptionId".to_owned(), value.subscription_id.clone()),
                ("resourceGroupName".to_owned(), value.resource_group_name.clone()),
                ("serverName".to_owned(), value.server_name.clone()),
                ("databaseName".to_owned(), value.database_name.clone()),
                ("deletionTime".to_owned(), value.deletion_time.clone()),
            ]),
        }
    }
}
