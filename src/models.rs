//! wire models for the Panopto v1 REST api
use serde::{Deserialize, Serialize};

/// The top level of the folder tree is addressed by the zero GUID. It is not
/// a real folder and some API calls behave differently for it: there is no
/// detail fetch, while children and search remain valid.
pub const TOP_LEVEL_ID: &str = "00000000-0000-0000-0000-000000000000";

/// A folder as returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Folder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// absent for folders sitting at the top level
    #[serde(default)]
    pub parent_folder: Option<ParentFolder>,
    /// site links, present on detail fetches
    #[serde(default)]
    pub urls: Option<FolderUrls>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParentFolder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderUrls {
    #[serde(default)]
    pub folder_url: String,
    #[serde(default)]
    pub embed_url: String,
    #[serde(default)]
    pub share_settings_url: String,
}

/// A recording session inside a folder. Only listed, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// paged list envelope used by the search/children/sessions endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultsEnvelope<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

/// Just enough of a folder to address and describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub id: String,
    pub name: String,
}

impl From<&Folder> for FolderRef {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            name: folder.name.clone(),
        }
    }
}
