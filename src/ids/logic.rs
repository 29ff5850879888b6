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

use crate::resourceids::{resource_id, Segment};

resource_id! {
    pub struct WorkflowId("Workflow") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workflow_name: "workflowName" => "Workflow Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftLogic", "Microsoft.Logic"),
        Segment::static_segment("staticWorkflows", "workflows"),
        Segment::user_specified("workflowName", "workflowValue"),
    ];
}

resource_id! {
    /// An action of a single Logic App workflow run
    pub struct WorkflowRunActionId("Workflow Run Action") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workflow_name: "workflowName" => "Workflow Name",
        run_name: "runName" => "Run Name",
        action_name: "actionName" => "Action Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftLogic", "Microsoft.Logic"),
        Segment::static_segment("staticWorkflows", "workflows"),
        Segment::user_specified("workflowName", "workflowValue"),
        Segment::static_segment("staticRuns", "runs"),
        Segment::user_specified("runName", "runValue"),
        Segment::static_segment("staticActions", "actions"),
        Segment::user_specified("actionName", "actionValue"),
    ];
}

impl WorkflowRunActionId {
    pub fn workflow_id(&self) -> WorkflowId {
        WorkflowId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.workflow_name.as_str(),
        )
    }
}
