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
    /// A policy exemption, at any scope
    pub struct PolicyExemptionId("Policy Exemption") {
        scope: "scope" => "Scope",
        policy_exemption_name: "policyExemptionName" => "Policy Exemption Name",
    }
    segments = [
        Segment::scope("scope", "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/some-resource-group"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAuthorization", "Microsoft.Authorization"),
        Segment::static_segment("staticPolicyExemptions", "policyExemptions"),
        Segment::user_specified("policyExemptionName", "policyExemptionValue"),
    ];
}

lazy_static! {
    static ref MANAGEMENT_GROUP_SCOPE: Regex =
        Regex::new(r"(?i)^/providers/Microsoft\.Management/managementGroups/([^/]+)$").unwrap();
    static ref SUBSCRIPTION_SCOPE: Regex = Regex::new(r"(?i)^/subscriptions/([^/]+)$").unwrap();
    static ref RESOURCE_GROUP_SCOPE: Regex =
        Regex::new(r"(?i)^/subscriptions/([^/]+)/resourceGroups/([^/]+)$").unwrap();
    static ref RESOURCE_POLICY_EXEMPTION: Regex =
        Regex::new(r"(?i)^(.+)/providers/Microsoft\.Authorization/policyExemptions/([^/]+)$")
            .unwrap();
    static ref RESOURCE_POLICY_REMEDIATION: Regex =
        Regex::new(r"(?i)^(.+)/providers/Microsoft\.PolicyInsights/remediations/([^/]+)$")
            .unwrap();
}

/// The scope a policy object is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PolicyScopeId {
    ManagementGroup {
        name: String,
    },
    Subscription {
        subscription_id: String,
    },
    ResourceGroup {
        subscription_id: String,
        resource_group_name: String,
    },
    Resource {
        id: String,
    },
}

impl PolicyScopeId {
    pub const ID_TYPE: &'static str = "Policy Scope";

    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        if input.is_empty() {
            return Err(ResourceIdError::Empty {
                id_type: Self::ID_TYPE,
            });
        }
        if let Some(captures) = MANAGEMENT_GROUP_SCOPE.captures(input) {
            return Ok(Self::ManagementGroup {
                name: captures[1].to_owned(),
            });
        }
        if let Some(captures) = SUBSCRIPTION_SCOPE.captures(input) {
            return Ok(Self::Subscription {
                subscription_id: captures[1].to_owned(),
            });
        }
        if let Some(captures) = RESOURCE_GROUP_SCOPE.captures(input) {
            return Ok(Self::ResourceGroup {
                subscription_id: captures[1].to_owned(),
                resource_group_name: captures[2].to_owned(),
            });
        }

        let resource = AzureResourceId::parse(Self::ID_TYPE, input)?;
        if resource.provider.is_empty() {
            return Err(ResourceIdError::malformed(
                Self::ID_TYPE,
                input,
                "the scope is neither a management group, a subscription, a resource group nor a resource",
            ));
        }
        Ok(Self::Resource {
            id: input.to_owned(),
        })
    }

    pub fn id(&self) -> String {
        match self {
            Self::ManagementGroup { name } => {
                format!("/providers/Microsoft.Management/managementGroups/{name}")
            }
            Self::Subscription { subscription_id } => format!("/subscriptions/{subscription_id}"),
            Self::ResourceGroup {
                subscription_id,
                resource_group_name,
            } => format!("/subscriptions/{subscription_id}/resourceGroups/{resource_group_name}"),
            Self::Resource { id } => id.clone(),
        }
    }
}

fn parse_resource_scoped(
    id_type: &'static str,
    pattern: &Regex,
    input: &str,
) -> Result<(String, String), ResourceIdError> {
    if input.is_empty() {
        return Err(ResourceIdError::Empty { id_type });
    }
    let captures = pattern.captures(input).ok_or_else(|| {
        ResourceIdError::malformed(id_type, input, "the ID does not match the expected format")
    })?;

    match PolicyScopeId::parse(&captures[1])? {
        PolicyScopeId::Resource { id } => Ok((id, captures[2].to_owned())),
        _ => Err(ResourceIdError::malformed(
            id_type,
            input,
            format!("the scope {:?} is not a resource ID", &captures[1]),
        )),
    }
}

/// A policy exemption attached to a single resource.
///
/// Parsed by splitting on the provider segment, ignoring its casing since
/// the API does not return it consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourcePolicyExemptionId {
    pub resource_id: String,
    pub name: String,
}

impl ResourcePolicyExemptionId {
    pub const ID_TYPE: &'static str = "Resource Policy Exemption";

    pub fn new(resource_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            name: name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let (resource_id, name) =
            parse_resource_scoped(Self::ID_TYPE, &RESOURCE_POLICY_EXEMPTION, input)?;
        Ok(Self { resource_id, name })
    }

    pub fn id(&self) -> String {
        format!(
            "{}/providers/Microsoft.Authorization/policyExemptions/{}",
            self.resource_id, self.name
        )
    }
}

impl Display for ResourcePolicyExemptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Resource: {:?} / Name: {:?})",
            Self::ID_TYPE,
            self.resource_id,
            self.name
        )
    }
}

/// A policy remediation attached to a single resource.
///
/// Same parsing rules as [`ResourcePolicyExemptionId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourcePolicyRemediationId {
    pub resource_id: String,
    pub name: String,
}

impl ResourcePolicyRemediationId {
    pub const ID_TYPE: &'static str = "Resource Policy Remediation";

    pub fn new(resource_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            name: name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let (resource_id, name) =
            parse_resource_scoped(Self::ID_TYPE, &RESOURCE_POLICY_REMEDIATION, input)?;
        Ok(Self { resource_id, name })
    }

    pub fn id(&self) -> String {
        format!(
            "{}/providers/Microsoft.PolicyInsights/remediations/{}",
            self.resource_id, self.name
        )
    }
}

impl Display for ResourcePolicyRemediationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Resource: {:?} / Name: {:?})",
            Self::ID_TYPE,
            self.resource_id,
            self.name
        )
    }
}

impl From<&ResourcePolicyExemptionId> for ParsedResourceId {
    fn from(value: &ResourcePolicyExemptionId) -> Self {
        Self {
            id: value.id(),
            description: value.to_string(),
            segments: BTreeMap::from([
                ("resourceId".to_owned(), value.resource_id.clone()),
                ("policyExemptionName".to_owned(), value.name.clone()),
            ]),
        }
    }
}

impl From<&ResourcePolicyRemediationId> for ParsedResourceId {
    fn from(value: &ResourcePolicyRemediationId) -> Self {
        Self {
            id: value.id(),
            description: value.to_string(),
            segments: BTreeMap::from([
                ("resourceId".to_owned(), value.resource_id.clone()),
                ("remediationName".to_owned(), value.name.clone()),
            ]),
        }
    }
}
