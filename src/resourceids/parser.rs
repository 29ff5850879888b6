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

use tracing::trace;

use crate::utils::DisplayJoinable;

use super::error::ResourceIdError;
use super::segment::{example_id, Segment, SegmentKind};

/// Values extracted from a resource ID, keyed by segment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub id_type: &'static str,
    pub raw_input: String,
    parsed: BTreeMap<&'static str, String>,
}

impl ParseResult {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parsed.get(name).map(String::as_str)
    }

    /// Value of a segment that has to be present and non-empty
    pub fn required(&self, name: &'static str) -> Result<&str, ResourceIdError> {
        match self.get(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ResourceIdError::MissingSegmentValue {
                id_type: self.id_type,
                segment: name,
                input: self.raw_input.clone(),
            }),
        }
    }
}

/// Parser for a fixed resource ID template
#[derive(Debug, Clone, Copy)]
pub struct ResourceIdParser<'s> {
    id_type: &'static str,
    segments: &'s [Segment],
}

impl<'s> ResourceIdParser<'s> {
    pub fn new(id_type: &'static str, segments: &'s [Segment]) -> Self {
        Self { id_type, segments }
    }

    /// Split `input` along the template.
    ///
    /// When `insensitively` is set, fixed segments and constants are matched
    /// ignoring ASCII case and replaced by their canonical spelling. User
    /// supplied values are always kept verbatim.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<ParseResult, ResourceIdError> {
        if input.is_empty() {
            return Err(ResourceIdError::Empty {
                id_type: self.id_type,
            });
        }

        let trimmed = input.strip_prefix('/').unwrap_or(input);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let components = trimmed.split('/').collect::<Vec<_>>();

        let mut result = ParseResult {
            id_type: self.id_type,
            raw_input: input.to_owned(),
            parsed: BTreeMap::new(),
        };

        let scope_position = self
            .segments
            .iter()
            .position(|segment| segment.kind == SegmentKind::Scope);

        match scope_position {
            Some(position) => {
                self.parse_scoped(input, &components, position, insensitively, &mut result)?
            }
            None => {
                for (i, segment) in self.segments.iter().enumerate() {
                    let Some(component) = components.get(i) else {
                        return Err(self.not_specified(segment, input));
                    };
                    self.parse_component(segment, component, input, insensitively, &mut result)?;
                }
                if components.len() > self.segments.len() {
                    return Err(ResourceIdError::UnexpectedSegment {
                        id_type: self.id_type,
                        remainder: components[self.segments.len()..].join("/"),
                        input: input.to_owned(),
                    });
                }
            }
        }

        trace!(id_type = self.id_type, input, "parsed resource id");
        Ok(result)
    }

    fn parse_scoped(
        &self,
        input: &str,
        components: &[&str],
        position: usize,
        insensitively: bool,
        result: &mut ParseResult,
    ) -> Result<(), ResourceIdError> {
        let before = &self.segments[..position];
        let scope = &self.segments[position];
        let after = &self.segments[position + 1..];

        if components.len() < before.len() + after.len() + 1 {
            let missing = self
                .segments
                .get(components.len())
                .unwrap_or(scope);
            return Err(self.not_specified(missing, input));
        }

        for (segment, component) in before.iter().zip(components) {
            self.parse_component(segment, component, input, insensitively, result)?;
        }

        let tail_start = components.len() - after.len();
        let scope_components = &components[before.len()..tail_start];
        if scope_components.iter().all(|component| component.is_empty()) {
            return Err(ResourceIdError::MissingSegmentValue {
                id_type: self.id_type,
                segment: scope.name,
                input: input.to_owned(),
            });
        }
        result
            .parsed
            .insert(scope.name, format!("/{}", scope_components.join("/")));

        for (segment, component) in after.iter().zip(&components[tail_start..]) {
            self.parse_component(segment, component, input, insensitively, result)?;
        }
        Ok(())
    }

    fn parse_component(
        &self,
        segment: &Segment,
        component: &str,
        input: &str,
        insensitively: bool,
        result: &mut ParseResult,
    ) -> Result<(), ResourceIdError> {
        let matches = |expected: &str| {
            component == expected || (insensitively && component.eq_ignore_ascii_case(expected))
        };

        let value = match segment.kind {
            SegmentKind::Static(expected) | SegmentKind::ResourceProvider(expected) => {
                if !matches(expected) {
                    return Err(self.not_specified(segment, input));
                }
                expected.to_owned()
            }
            SegmentKind::Constant(allowed) => {
                if component.is_empty() {
                    return Err(self.missing_value(segment, input));
                }
                match allowed.iter().copied().find(|value| matches(value)) {
                    Some(value) => value.to_owned(),
                    None => {
                        return Err(ResourceIdError::InvalidConstantValue {
                            id_type: self.id_type,
                            segment: segment.name,
                            value: component.to_owned(),
                            allowed: allowed.iter().join_with(", ").to_string(),
                            input: input.to_owned(),
                        })
                    }
                }
            }
            SegmentKind::SubscriptionId
            | SegmentKind::ResourceGroup
            | SegmentKind::UserSpecified
            | SegmentKind::Scope => {
                if component.is_empty() {
                    return Err(self.missing_value(segment, input));
                }
                component.to_owned()
            }
        };

        result.parsed.insert(segment.name, value);
        Ok(())
    }

    fn not_specified(&self, segment: &Segment, input: &str) -> ResourceIdError {
        ResourceIdError::SegmentNotSpecified {
            id_type: self.id_type,
            segment: segment.to_string(),
            input: input.to_owned(),
            example: example_id(self.segments),
        }
    }

    fn missing_value(&self, segment: &Segment, input: &str) -> ResourceIdError {
        ResourceIdError::MissingSegmentValue {
            id_type: self.id_type,
            segment: segment.name,
            input: input.to_owned(),
        }
    }
}
