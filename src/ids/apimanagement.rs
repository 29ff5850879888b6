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
    /// An API Management service instance
    pub struct ServiceId("Service") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        service_name: "serviceName" => "Service Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftApiManagement", "Microsoft.ApiManagement"),
        Segment::static_segment("staticService", "service"),
        Segment::user_specified("serviceName", "serviceValue"),
    ];
}

resource_id! {
    pub struct ApiId("Api") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        service_name: "serviceName" => "Service Name",
        api_id: "apiId" => "Api",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftApiManagement", "Microsoft.ApiManagement"),
        Segment::static_segment("staticService", "service"),
        Segment::user_specified("serviceName", "serviceValue"),
        Segment::static_segment("staticApis", "apis"),
        Segment::user_specified("apiId", "apiIdValue"),
    ];
}

impl ApiId {
    pub fn service_id(&self) -> ServiceId {
        ServiceId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.service_name.as_str(),
        )
    }
}

resource_id! {
    /// A tag description attached to an API
    pub struct ApiTagDescriptionsId("Api Tag Descriptions") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        service_name: "serviceName" => "Service Name",
        api_id: "apiId" => "Api",
        tag_description_id: "tagDescriptionId" => "Tag Description",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftApiManagement", "Microsoft.ApiManagement"),
        Segment::static_segment("staticService", "service"),
        Segment::user_specified("serviceName", "serviceValue"),
        Segment::static_segment("staticApis", "apis"),
        Segment::user_specified("apiId", "apiIdValue"),
        Segment::static_segment("staticTagDescriptions", "tagDescriptions"),
        Segment::user_specified("tagDescriptionId", "tagDescriptionIdValue"),
    ];
}

impl ApiTagDescriptionsId {
    pub fn api_id(&self) -> ApiId {
        ApiId::new(
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.service_name.as_str(),
            self.api_id.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ids::testing::{assert_case_insensitive, assert_rejects_truncations};
    use crate::resourceids::ResourceIdError;

    const TAG_DESCRIPTION: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.ApiManagement/service/service1/apis/api1/tagDescriptions/tagDescriptionId1";

    fn tag_description() -> ApiTagDescriptionsId {
        ApiTagDescriptionsId::new(
            "12345678-1234-9876-4563-123456789012",
            "resGroup1",
            "service1",
            "api1",
            "tagDescriptionId1",
        )
    }

    #[test]
    fn new_tag_description_id() {
        let id = tag_description();
        assert_eq!(id.subscription_id, "12345678-1234-9876-4563-123456789012");
        assert_eq!(id.resource_group_name, "resGroup1");
        assert_eq!(id.service_name, "service1");
        assert_eq!(id.api_id, "api1");
        assert_eq!(id.tag_description_id, "tagDescriptionId1");
    }

    #[test]
    fn format_tag_description_id() {
        assert_eq!(tag_description().id(), TAG_DESCRIPTION);
    }

    #[test]
    fn parse_tag_description_id() {
        assert_eq!(ApiTagDescriptionsId::parse(TAG_DESCRIPTION), Ok(tag_description()));
        assert_rejects_truncations::<ApiTagDescriptionsId>(TAG_DESCRIPTION);
        assert!(matches!(
            ApiTagDescriptionsId::parse(&format!("{TAG_DESCRIPTION}/extra")),
            Err(ResourceIdError::UnexpectedSegment { .. })
        ));
    }

    #[test]
    fn parse_tag_description_id_insensitively() {
        assert_case_insensitive(&tag_description());
        assert_eq!(
            ApiTagDescriptionsId::parse_insensitively(
                "/sUbScRiPtIoNs/12345678-1234-9876-4563-123456789012/rEsOuRcEgRoUpS/resGroup1/pRoViDeRs/mIcRoSoFt.aPiMaNaGeMeNt/sErViCe/service1/aPiS/api1/tAgDeScRiPtIoNs/tagDescriptionId1"
            ),
            Ok(tag_description())
        );
    }

    #[test]
    fn display_tag_description_id() {
        assert_eq!(
            tag_description().to_string(),
            "Api Tag Descriptions (Subscription: \"12345678-1234-9876-4563-123456789012\" / Resource Group Name: \"resGroup1\" / Service Name: \"service1\" / Api: \"api1\" / Tag Description: \"tagDescriptionId1\")"
        );
    }

    #[test]
    fn parent_ids() {
        let api = tag_description().api_id();
        assert_eq!(
            api.id(),
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.ApiManagement/service/service1/apis/api1"
        );
        assert_eq!(ApiId::parse(&api.id()), Ok(api.clone()));
        assert_rejects_truncations::<ApiId>(&api.id());
        assert_case_insensitive(&api);

        let service = api.service_id();
        assert_eq!(ServiceId::parse(&service.id()), Ok(service.clone()));
        assert_case_insensitive(&service);
    }
}
