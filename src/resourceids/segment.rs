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

use std::fmt::Display;

/// What a segment of a resource ID template accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A fixed literal, such as `resourceGroups` or `apis`
    Static(&'static str),
    /// A fixed provider namespace, such as `Microsoft.Sql`
    ResourceProvider(&'static str),
    /// The subscription GUID
    SubscriptionId,
    /// The resource group name
    ResourceGroup,
    /// A name chosen by the user
    UserSpecified,
    /// One value out of a closed set
    Constant(&'static [&'static str]),
    /// A variable-length prefix that is itself a resource ID
    Scope,
}

/// A single element of a resource ID template.
///
/// Segments are declared as constants alongside each ID type, and drive both
/// the parser and the rendering of the ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Name under which the parsed value is stored
    pub name: &'static str,
    pub kind: SegmentKind,
    /// Value used when rendering an example ID in error messages
    pub example: &'static str,
}

impl Segment {
    pub const fn static_segment(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Static(value),
            example: value,
        }
    }

    pub const fn resource_provider(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceProvider(value),
            example: value,
        }
    }

    pub const fn subscription_id(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::SubscriptionId,
            example: "12345678-1234-9876-4563-123456789012",
        }
    }

    pub const fn resource_group(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceGroup,
            example: "example-resource-group",
        }
    }

    pub const fn user_specified(name: &'static str, example: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::UserSpecified,
            example,
        }
    }

    pub const fn constant(
        name: &'static str,
        values: &'static [&'static str],
        example: &'static str,
    ) -> Self {
        Self {
            name,
            kind: SegmentKind::Constant(values),
            example,
        }
    }

    pub const fn scope(name: &'static str, example: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Scope,
            example,
        }
    }

    /// Literal value of a static or provider segment
    pub fn fixed_value(&self) -> Option<&'static str> {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the value of this segment is chosen by the caller rather than fixed by the template
    pub fn is_user_value(&self) -> bool {
        self.fixed_value().is_none()
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SegmentKind::Static(value) => write!(f, "static segment `{value}`"),
            SegmentKind::ResourceProvider(value) => write!(f, "resource provider `{value}`"),
            SegmentKind::SubscriptionId => write!(f, "subscription id `{}`", self.name),
            SegmentKind::ResourceGroup => write!(f, "resource group name `{}`", self.name),
            SegmentKind::UserSpecified => write!(f, "value for `{}`", self.name),
            SegmentKind::Constant(_) => write!(f, "constant value for `{}`", self.name),
            SegmentKind::Scope => write!(f, "scope `{}`", self.name),
        }
    }
}

/// Render an ID from its template, looking up the caller-supplied values by segment name.
///
/// Missing values are rendered empty, which the parser will then reject.
pub fn format_id<'a, F>(segments: &[Segment], value_of: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut id = String::new();
    for segment in segments {
        let value = segment
            .fixed_value()
            .or_else(|| value_of(segment.name))
            .unwrap_or_default();
        match segment.kind {
            SegmentKind::Scope => {
                let value = value.trim_end_matches('/');
                if !value.starts_with('/') {
                    id.push('/');
                }
                id.push_str(value);
            }
            _ => {
                id.push('/');
                id.push_str(value);
            }
        }
    }
    id
}

/// Render an example ID using each segment's example value
pub fn example_id(segments: &[Segment]) -> String {
    format_id(segments, |name| {
        segments
            .iter()
            .find(|segment| segment.name == name)
            .map(|segment| segment.example)
    })
}
