//! Request bodies, responses and the media-type maps they both carry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// One entry of a `content` map, keyed by MIME type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

ref_or!(
    /// `requestBody` inline or as `#/components/requestBodies/...`.
    RequestBodyOrRef::RequestBody(RequestBody) => RequestBody
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    /// Empty for responses without a body.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

ref_or!(
    /// A response inline or as `#/components/responses/...`.
    ResponseOrRef::Response(Response) => Response
);
