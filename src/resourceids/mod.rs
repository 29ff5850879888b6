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

//! Resource ID codec: a segment grammar for ARM path templates, and the
//! typed IDs built on top of it.

use std::collections::BTreeMap;
use std::fmt::Display;

mod error;
pub mod legacy;
mod parser;
mod segment;

pub use error::ResourceIdError;
pub use parser::{ParseResult, ResourceIdParser};
pub use segment::{example_id, format_id, Segment, SegmentKind};

/// A typed resource ID with a fixed path template
pub trait ResourceId: Sized + Display {
    /// Human readable name of the ID type, used in messages
    const ID_TYPE: &'static str;
    const SEGMENTS: &'static [Segment];

    fn from_parse_result(result: &ParseResult) -> Result<Self, ResourceIdError>;

    /// Value of a caller supplied segment
    fn segment_value(&self, name: &str) -> Option<&str>;

    fn id(&self) -> String {
        format_id(Self::SEGMENTS, |name| self.segment_value(name))
    }

    fn parser() -> ResourceIdParser<'static> {
        ResourceIdParser::new(Self::ID_TYPE, Self::SEGMENTS)
    }

    fn parse_with(input: &str, insensitively: bool) -> Result<Self, ResourceIdError> {
        let result = Self::parser().parse(input, insensitively)?;
        Self::from_parse_result(&result)
    }

    fn example_id() -> String {
        example_id(Self::SEGMENTS)
    }
}

/// Check that `input` is a valid ID of type `T`, returning the list of errors
pub fn validate_resource_id<T: ResourceId>(input: &str) -> Vec<String> {
    match T::parse_with(input, false) {
        Ok(_) => Vec::new(),
        Err(err) => vec![err.to_string()],
    }
}

/// Type-erased view of a parsed resource ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResourceId {
    /// Normalized ID string
    pub id: String,
    pub description: String,
    /// User supplied values keyed by segment name
    pub segments: BTreeMap<String, String>,
}

impl ParsedResourceId {
    pub fn from_typed<T: ResourceId>(id: &T) -> Self {
        Self {
            id: id.id(),
            description: id.to_string(),
            segments: T::SEGMENTS
                .iter()
                .filter(|segment| segment.is_user_value())
                .filter_map(|segment| {
                    Some((
                        segment.name.to_owned(),
                        id.segment_value(segment.name)?.to_owned(),
                    ))
                })
                .collect(),
        }
    }
}

/// Declare a typed resource ID.
///
/// Each field is bound to the name of the segment carrying its value and to
/// the label used by `Display`:
///
/// ```ignore
/// resource_id! {
///     pub struct ServerId("Server") {
///         subscription_id: "subscriptionId" => "Subscription",
///         resource_group_name: "resourceGroupName" => "Resource Group Name",
///         server_name: "serverName" => "Server Name",
///     }
///     segments = [ /* Segment constructors */ ];
/// }
/// ```
macro_rules! resource_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($label:literal) {
            $( $field:ident : $segment:literal => $display:literal ),+ $(,)?
        }
        segments = [ $($seg:expr),+ $(,)? ];
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            $( pub $field: String, )+
        }

        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: impl Into<String>),+) -> Self {
                Self { $($field: $field.into(),)+ }
            }

            /// Parse an ID, requiring the exact casing of the fixed segments
            pub fn parse(input: &str) -> Result<Self, $crate::resourceids::ResourceIdError> {
                <Self as $crate::resourceids::ResourceId>::parse_with(input, false)
            }

            /// Parse an ID returned by the API, whatever the casing of the fixed segments
            pub fn parse_insensitively(
                input: &str,
            ) -> Result<Self, $crate::resourceids::ResourceIdError> {
                <Self as $crate::resourceids::ResourceId>::parse_with(input, true)
            }

            pub fn id(&self) -> String {
                <Self as $crate::resourceids::ResourceId>::id(self)
            }
        }

        impl $crate::resourceids::ResourceId for $name {
            const ID_TYPE: &'static str = $label;
            const SEGMENTS: &'static [$crate::resourceids::Segment] = &[$($seg),+];

            fn from_parse_result(
                result: &$crate::resourceids::ParseResult,
            ) -> Result<Self, $crate::resourceids::ResourceIdError> {
                Ok(Self {
                    $( $field: result.required($segment)?.to_owned(), )+
                })
            }

            fn segment_value(&self, name: &str) -> Option<&str> {
                match name {
                    $( $segment => Some(self.$field.as_str()), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                use $crate::utils::DisplayJoinable;
                let components = [$( ($display, self.$field.as_str()) ),+];
                write!(
                    f,
                    "{} ({})",
                    $label,
                    components
                        .iter()
                        .map(|(label, value)| format!("{label}: {value:?}"))
                        .join_with(" / ")
                )
            }
        }
    };
}

pub(crate) use resource_id;
