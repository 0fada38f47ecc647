//! remote folder service: operation trait + reqwest implementation
use {
    crate::{
        auth::OAuth2Provider,
        config::HttpSettings,
        error::{ApiError, Result},
        models::{Folder, Session},
    },
    async_trait::async_trait,
    reqwest::{Client, Method, Response, StatusCode},
    serde::de::DeserializeOwned,
    std::time::Duration,
    tracing::{debug, warn},
};

pub mod folders;

/// Operations the tool needs from the remote folder service.
///
/// The two update operations and `delete` resolve to `Ok(false)` when the
/// service refuses the change because the target name or slot is already
/// occupied; transport and authorization failures surface as errors.
#[async_trait]
pub trait FolderApi: Send + Sync {
    /// folder detail; not valid for the top-level sentinel
    async fn get(&self, id: &str) -> Result<Folder>;
    /// direct children, in the service's ordering
    async fn children(&self, id: &str) -> Result<Vec<Folder>>;
    /// keyword search over the folder index, in the service's ordering
    async fn search(&self, query: &str) -> Result<Vec<Folder>>;
    /// rename; `false` when a sibling already carries the name
    async fn update_name(&self, id: &str, new_name: &str) -> Result<bool>;
    /// reparent; `false` when the destination already has a child with the
    /// folder's name. The destination name is carried for log output only.
    async fn update_parent(
        &self,
        id: &str,
        new_parent_id: &str,
        new_parent_name: &str,
    ) -> Result<bool>;
    /// sessions recorded in the folder
    async fn sessions(&self, id: &str) -> Result<Vec<Session>>;
    /// delete; `false` when the service refuses
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// build the shared http client from the http settings
pub fn build_http_client(settings: &HttpSettings, skip_verify: bool) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs));

    if skip_verify {
        warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}

/// reqwest-backed client for the Panopto v1 REST surface
pub struct FolderClient {
    http: Client,
    api_base: String,
    auth: OAuth2Provider,
}

impl FolderClient {
    pub fn new(http: Client, site_base: &str, auth: OAuth2Provider) -> Self {
        Self {
            http,
            api_base: format!("{site_base}/Panopto/api/v1"),
            auth,
        }
    }

    /// Issue a request with a bearer token. A 401 invalidates the cached
    /// token and the request is retried once with a fresh one.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let mut retry_unauthorized = true;
        loop {
            let bearer = self.auth.bearer().await?;
            let mut request = self.http.request(method.clone(), url).bearer_auth(bearer);
            if let Some(body) = &body {
                request = request.json(body);
            }
            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED && retry_unauthorized {
                debug!(url, "401 from the service, refreshing access token");
                self.auth.invalidate().await;
                retry_unauthorized = false;
                continue;
            }
            return Ok(response);
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(Method::GET, url, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        Ok(response.json().await?)
    }

    /// true on success, false when the service refuses due to a conflict
    async fn send_conflictable(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<bool> {
        let response = self.send(method, url, body).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::CONFLICT {
            debug!(url, status = status.as_u16(), "change refused by the service");
            return Ok(false);
        }
        Err(api_error(status, response).await)
    }
}

async fn api_error(status: StatusCode, response: Response) -> ApiError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ApiError::Auth(format!(
            "service rejected the request: http {}",
            status.as_u16()
        ));
    }
    let message = response.text().await.unwrap_or_default();
    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
pub mod testing {
    //! in-memory stand-in for the remote service, for exercising flow logic
    use {
        super::FolderApi,
        crate::{
            error::{ApiError, Result},
            models::{Folder, ParentFolder, Session, TOP_LEVEL_ID},
        },
        async_trait::async_trait,
        std::sync::Mutex,
    };

    #[derive(Debug, Clone)]
    struct Node {
        id: String,
        name: String,
        parent: String,
    }

    /// A small folder tree with the same conflict rules as the real service:
    /// renames are refused when a sibling holds the name, moves when the
    /// destination already has a child with the folder's name.
    #[derive(Default)]
    pub struct FakeFolders {
        nodes: Mutex<Vec<Node>>,
        sessions: Mutex<Vec<Session>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFolders {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_folder(self, id: &str, name: &str, parent: &str) -> Self {
            self.nodes.lock().unwrap().push(Node {
                id: id.into(),
                name: name.into(),
                parent: parent.into(),
            });
            self
        }

        pub fn with_session(self, id: &str, name: &str) -> Self {
            self.sessions.lock().unwrap().push(Session {
                id: id.into(),
                name: name.into(),
            });
            self
        }

        /// every operation issued so far, as `op:arg` strings in call order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn name_of(&self, id: &str) -> Option<String> {
            let nodes = self.nodes.lock().unwrap();
            nodes.iter().find(|n| n.id == id).map(|n| n.name.clone())
        }

        pub fn parent_of(&self, id: &str) -> Option<String> {
            let nodes = self.nodes.lock().unwrap();
            nodes.iter().find(|n| n.id == id).map(|n| n.parent.clone())
        }

        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn to_folder(nodes: &[Node], node: &Node) -> Folder {
            let parent_name = nodes
                .iter()
                .find(|n| n.id == node.parent)
                .map(|n| n.name.clone());
            Folder {
                id: node.id.clone(),
                name: node.name.clone(),
                parent_folder: (node.parent != TOP_LEVEL_ID).then(|| ParentFolder {
                    id: node.parent.clone(),
                    name: parent_name.unwrap_or_default(),
                }),
                urls: None,
            }
        }

        fn missing(id: &str) -> ApiError {
            ApiError::Api {
                status: 404,
                message: format!("no folder {id}"),
            }
        }
    }

    #[async_trait]
    impl FolderApi for FakeFolders {
        async fn get(&self, id: &str) -> Result<Folder> {
            self.log(format!("get:{id}"));
            let nodes = self.nodes.lock().unwrap();
            nodes
                .iter()
                .find(|n| n.id == id)
                .map(|n| Self::to_folder(&nodes, n))
                .ok_or_else(|| Self::missing(id))
        }

        async fn children(&self, id: &str) -> Result<Vec<Folder>> {
            self.log(format!("children:{id}"));
            let nodes = self.nodes.lock().unwrap();
            Ok(nodes
                .iter()
                .filter(|n| n.parent == id)
                .map(|n| Self::to_folder(&nodes, n))
                .collect())
        }

        async fn search(&self, query: &str) -> Result<Vec<Folder>> {
            self.log(format!("search:{query}"));
            let needle = query.to_ascii_lowercase();
            let nodes = self.nodes.lock().unwrap();
            Ok(nodes
                .iter()
                .filter(|n| n.name.to_ascii_lowercase().contains(&needle))
                .map(|n| Self::to_folder(&nodes, n))
                .collect())
        }

        async fn update_name(&self, id: &str, new_name: &str) -> Result<bool> {
            self.log(format!("rename:{id}:{new_name}"));
            let mut nodes = self.nodes.lock().unwrap();
            let Some(pos) = nodes.iter().position(|n| n.id == id) else {
                return Err(Self::missing(id));
            };
            let parent = nodes[pos].parent.clone();
            if nodes
                .iter()
                .any(|n| n.id != id && n.parent == parent && n.name == new_name)
            {
                return Ok(false);
            }
            nodes[pos].name = new_name.to_string();
            Ok(true)
        }

        async fn update_parent(
            &self,
            id: &str,
            new_parent_id: &str,
            _new_parent_name: &str,
        ) -> Result<bool> {
            self.log(format!("move:{id}:{new_parent_id}"));
            let mut nodes = self.nodes.lock().unwrap();
            let Some(pos) = nodes.iter().position(|n| n.id == id) else {
                return Err(Self::missing(id));
            };
            let name = nodes[pos].name.clone();
            if nodes
                .iter()
                .any(|n| n.id != id && n.parent == new_parent_id && n.name == name)
            {
                return Ok(false);
            }
            nodes[pos].parent = new_parent_id.to_string();
            Ok(true)
        }

        async fn sessions(&self, id: &str) -> Result<Vec<Session>> {
            self.log(format!("sessions:{id}"));
            Ok(self.sessions.lock().unwrap().clone())
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            self.log(format!("delete:{id}"));
            let mut nodes = self.nodes.lock().unwrap();
            let before = nodes.len();
            nodes.retain(|n| n.id != id);
            Ok(nodes.len() < before)
        }
    }
}
