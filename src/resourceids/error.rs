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

use thiserror::Error;

/// Error returned when a string cannot be parsed as a resource ID.
///
/// Every variant names the ID type and, where relevant, the offending segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    #[error("parsing {id_type} ID: cannot parse an empty string")]
    Empty { id_type: &'static str },

    #[error("parsing {input:?} as a {id_type} ID: the {segment} was not specified\n\nexpected an ID that matched:\n\n> {example}")]
    SegmentNotSpecified {
        id_type: &'static str,
        segment: String,
        input: String,
        example: String,
    },

    #[error("parsing {input:?} as a {id_type} ID: the segment `{segment}` has no value")]
    MissingSegmentValue {
        id_type: &'static str,
        segment: &'static str,
        input: String,
    },

    #[error("parsing {input:?} as a {id_type} ID: the segment `{segment}` must be one of [{allowed}] but got {value:?}")]
    InvalidConstantValue {
        id_type: &'static str,
        segment: &'static str,
        value: String,
        allowed: String,
        input: String,
    },

    #[error("parsing {input:?} as a {id_type} ID: unexpected trailing segments {remainder:?}")]
    UnexpectedSegment {
        id_type: &'static str,
        remainder: String,
        input: String,
    },

    #[error("parsing {input:?} as a {id_type} ID: {reason}")]
    Malformed {
        id_type: &'static str,
        reason: String,
        input: String,
    },
}

impl ResourceIdError {
    pub(crate) fn malformed(
        id_type: &'static str,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            id_type,
            reason: reason.into(),
            input: input.into(),
        }
    }
}
