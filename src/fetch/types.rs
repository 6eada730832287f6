use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user reference expanded from a list item (`Author` or `Editor`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Email address of the user. SharePoint leaves this empty for system accounts.
    #[serde(rename = "EMail", default)]
    pub email: Option<String>,
}

/// Metadata for one file in a document library, decoded from one listing item.
///
/// Items are decoded one at a time (see the `TryFrom<&Value>` impl), so an item with a
/// missing or wrongly typed field costs only that record, never the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Leaf name of the file (e.g., "Budget 2024.xlsx").
    #[serde(rename = "FileLeafRef", default)]
    pub file_leaf_ref: Option<String>,
    /// Server-relative path of the file.
    #[serde(rename = "FileRef", default)]
    pub file_ref: Option<String>,
    /// Size in bytes. SharePoint serialises this as a string, some gateways as a number.
    #[serde(rename = "File_x0020_Size", default)]
    pub file_size: Option<Value>,
    #[serde(rename = "Author", default)]
    pub author: Option<Identity>,
    #[serde(rename = "Editor", default)]
    pub editor: Option<Identity>,
    /// Creation timestamp in ISO 8601 form.
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
    /// Last modification timestamp in ISO 8601 form.
    #[serde(rename = "Modified", default)]
    pub modified: Option<String>,
}

impl TryFrom<&Value> for SourceRecord {
    type Error = TransformError;

    /// Decodes one raw listing item. The error names the file when `FileLeafRef` is readable.
    fn try_from(item: &Value) -> Result<Self, Self::Error> {
        SourceRecord::deserialize(item).map_err(|e| {
            let file_name = item
                .get("FileLeafRef")
                .and_then(Value::as_str)
                .map(str::to_string);
            TransformError::new(file_name, format!("malformed item: {}", e))
        })
    }
}

/// One bounded batch of raw items returned by a single listing call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Listing items in server order, still undecoded.
    pub items: Vec<Value>,
    /// Continuation link handed back by the server, if more items may follow.
    pub next_link: Option<String>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Position of the batch fetcher within the library listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListCursor {
    /// Nothing fetched yet.
    #[default]
    Start,
    /// Continue from the link returned with the previous page.
    Next(String),
    /// The server returned no continuation link; further fetches yield empty pages.
    Exhausted,
}
