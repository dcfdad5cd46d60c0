//! Serde model of the parts of a HAR 1.2 log entry that replay needs.
//!
//! Only `request.method`, `request.url` and `response.status` are required;
//! everything else falls back to an empty value so that exports from
//! different tools deserialize alike. Unknown fields are ignored.

use serde::Deserialize;

use crate::entry::NameValue;

macro_rules! har_data {
    ($name:ident, { $($field:tt)* }) => {
        #[derive(Debug, Default, Clone, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $($field)*
        }
    };
}

har_data!(HarEntry, {
    #[serde(default)]
    pub started_date_time: String,
    pub request: HarRequest,
    pub response: HarResponse,
});

har_data!(HarRequest, {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarPair>,
    #[serde(default)]
    pub query_string: Vec<HarPair>,
});

har_data!(HarResponse, {
    pub status: i64,
    #[serde(default)]
    pub headers: Vec<HarPair>,
    #[serde(default)]
    pub content: HarContent,
});

har_data!(HarContent, {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
});

har_data!(HarPair, {
    pub name: String,
    #[serde(default)]
    pub value: String,
});

impl From<&HarPair> for NameValue {
    fn from(pair: &HarPair) -> Self {
        NameValue::new(pair.name.clone(), pair.value.clone())
    }
}
