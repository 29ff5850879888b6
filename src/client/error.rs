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

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The connection failed or timed out before a response was received
    #[error("sending request to {url}: {message}")]
    Transport { url: String, message: String },

    #[error("sending request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}: {code}: {message}")]
    Status {
        url: String,
        status: u16,
        code: String,
        message: String,
    },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("building request url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Transient failure that did not reach the API
    pub fn is_dropped_connection(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Transport {
                url: url.to_owned(),
                message: err.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_owned(),
                source: err,
            }
        }
    }

    /// Build the error for a non-2xx response, decoding the ARM error body when there is one
    pub(crate) fn from_response_body(url: &str, status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<CloudError>(body) {
            Ok(CloudError { error: Some(error) }) => (
                error.code.unwrap_or_default(),
                error.message.unwrap_or_default(),
            ),
            _ => (String::new(), body.trim().to_owned()),
        };
        Self::Status {
            url: url.to_owned(),
            status,
            code,
            message,
        }
    }
}

/// Error body returned by Azure Resource Manager
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudError {
    pub error: Option<CloudErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cloud_error() {
        let err = ApiError::from_response_body(
            "https://management.azure.com/x",
            404,
            r#"{"error":{"code":"ResourceNotFound","message":"The Resource was not found."}}"#,
        );
        assert!(err.is_not_found());
        assert!(!err.is_dropped_connection());
        assert_eq!(
            err.to_string(),
            "unexpected status 404 from https://management.azure.com/x: ResourceNotFound: The Resource was not found."
        );
    }

    #[test]
    fn keeps_raw_body_otherwise() {
        let err = ApiError::from_response_body("https://management.azure.com/x", 502, "Bad Gateway\n");
        match err {
            ApiError::Status {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(code, "");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
