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
    /// A subscription, the root of every ARM resource ID
    pub struct SubscriptionId("Subscription") {
        subscription_id: "subscriptionId" => "Subscription",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
    ];
}

resource_id! {
    pub struct ResourceGroupId("Resource Group") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
    ];
}
