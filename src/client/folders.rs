//! folder operations against the v1 REST endpoints
use {
    super::{FolderApi, FolderClient},
    crate::{
        error::Result,
        models::{Folder, ResultsEnvelope, Session},
    },
    async_trait::async_trait,
    reqwest::Method,
    serde_json::json,
    tracing::{debug, info},
};

#[async_trait]
impl FolderApi for FolderClient {
    async fn get(&self, id: &str) -> Result<Folder> {
        let url = format!("{}/folders/{}", self.api_base, id);
        self.get_json(&url).await
    }

    async fn children(&self, id: &str) -> Result<Vec<Folder>> {
        let url = format!("{}/folders/{}/children", self.api_base, id);
        let page: ResultsEnvelope<Folder> = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<Folder>> {
        let url = format!(
            "{}/folders/search?searchQuery={}",
            self.api_base,
            urlencoding::encode(query)
        );
        debug!(query, "searching folders");
        let page: ResultsEnvelope<Folder> = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn update_name(&self, id: &str, new_name: &str) -> Result<bool> {
        let url = format!("{}/folders/{}", self.api_base, id);
        let renamed = self
            .send_conflictable(Method::PUT, &url, Some(json!({ "Name": new_name })))
            .await?;
        if renamed {
            info!(id, new_name, "renamed folder");
        }
        Ok(renamed)
    }

    async fn update_parent(
        &self,
        id: &str,
        new_parent_id: &str,
        new_parent_name: &str,
    ) -> Result<bool> {
        let url = format!("{}/folders/{}", self.api_base, id);
        let moved = self
            .send_conflictable(Method::PUT, &url, Some(json!({ "Parent": new_parent_id })))
            .await?;
        if moved {
            info!(id, parent = new_parent_name, "moved folder");
        }
        Ok(moved)
    }

    async fn sessions(&self, id: &str) -> Result<Vec<Session>> {
        let url = format!("{}/folders/{}/sessions", self.api_base, id);
        let page: ResultsEnvelope<Session> = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let url = format!("{}/folders/{}", self.api_base, id);
        self.send_conflictable(Method::DELETE, &url, None).await
    }
}
