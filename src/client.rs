use crate::error::{RequestError, RequestResult};
use crate::protocol::{
    AgentId, CreateAgentRequest, CreateAgentResponse, FunctionRequest, FunctionResponse,
    MemoryAddRequest, MemoryAddResponse, MemoryDeleteRequest, MemoryDeleteResponse, MemoryEntry,
    MemoryRetrieveRequest, MemoryRetrieveResponse, MemorySearchRequest, MemorySearchResponse,
    MemoryType, RootResponse, SendMessageRequest,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Thin wrapper over the agent service's REST surface.
///
/// Every call is a single attempt. Failures are logged once here and then
/// handed back to the caller untouched.
#[derive(Clone)]
pub struct AgentClient {
    base_url: String,
    api_key: String,
    http: HttpClient,
}

impl AgentClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            base_url: normalize_base_url(&config.base_url),
            api_key: config.api_key,
            http: HttpClient::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_agent(&self, request: &CreateAgentRequest) -> RequestResult<AgentId> {
        self.post_json::<_, CreateAgentResponse>(&["agent", "create"], request)
            .await
            .and_then(|body| body.agent_id.ok_or(RequestError::MissingField("agent_id")))
            .inspect_err(|err| error!("Error creating agent: {}", err.detail()))
    }

    pub async fn send_message(&self, agent_id: &AgentId, content: &str) -> RequestResult<Value> {
        let request = SendMessageRequest {
            agent_id: agent_id.clone(),
            content: content.to_string(),
        };

        self.post_json(&["message", "send"], &request)
            .await
            .inspect_err(|err| error!("Error sending message: {}", err.detail()))
    }

    /// The id always travels as a single path segment, escaped as needed.
    pub async fn get_agent_info(&self, agent_id: &AgentId) -> RequestResult<Value> {
        self.get_json(self.endpoint(&["agent", agent_id.as_str()]))
            .await
            .inspect_err(|err| error!("Error getting agent info: {}", err.detail()))
    }

    /// Hits the service root and returns its welcome message.
    pub async fn ping(&self) -> RequestResult<String> {
        self.get_json::<RootResponse>(self.endpoint(&[""]))
            .await
            .map(|body| body.message)
            .inspect_err(|err| error!("Error reaching agent service: {}", err.detail()))
    }

    pub async fn execute_function(
        &self,
        agent_id: &AgentId,
        function_name: &str,
        parameters: Value,
    ) -> RequestResult<Value> {
        let request = FunctionRequest {
            agent_id: agent_id.clone(),
            function_name: function_name.to_string(),
            parameters,
        };

        self.post_json::<_, FunctionResponse>(&["agent", "function"], &request)
            .await
            .map(|body| body.result)
            .inspect_err(|err| error!("Error executing function: {}", err.detail()))
    }

    pub async fn add_memory(
        &self,
        agent_id: &AgentId,
        memory_type: MemoryType,
        entry: MemoryEntry,
    ) -> RequestResult<MemoryAddResponse> {
        let request = MemoryAddRequest {
            agent_id: agent_id.clone(),
            memory_type,
            entry,
        };

        self.post_json(&["agent", "add"], &request)
            .await
            .inspect_err(|err| error!("Error adding memory: {}", err.detail()))
    }

    pub async fn search_memory(
        &self,
        agent_id: &AgentId,
        memory_type: MemoryType,
        query: &str,
        limit: u32,
    ) -> RequestResult<MemorySearchResponse> {
        let request = MemorySearchRequest {
            agent_id: agent_id.clone(),
            memory_type,
            query: query.to_string(),
            limit,
        };

        self.post_json(&["agent", "search"], &request)
            .await
            .inspect_err(|err| error!("Error searching memory: {}", err.detail()))
    }

    /// Fetch one memory entry by id. The service reads the request from the query string.
    pub async fn retrieve_memory(
        &self,
        agent_id: &AgentId,
        memory_type: MemoryType,
        memory_id: &str,
    ) -> RequestResult<MemoryRetrieveResponse> {
        let request = MemoryRetrieveRequest {
            agent_id: agent_id.clone(),
            memory_type,
            memory_id: memory_id.to_string(),
        };

        let url = self.endpoint(&["agent", "retrieve"]).map(|mut url| {
            url.query_pairs_mut()
                .append_pair("agent_id", request.agent_id.as_str())
                .append_pair("memory_type", request.memory_type.as_str())
                .append_pair("memory_id", &request.memory_id);
            url
        });

        self.get_json(url)
            .await
            .inspect_err(|err| error!("Error retrieving memory: {}", err.detail()))
    }

    pub async fn delete_memory(
        &self,
        agent_id: &AgentId,
        memory_type: MemoryType,
        memory_id: &str,
    ) -> RequestResult<MemoryDeleteResponse> {
        let request = MemoryDeleteRequest {
            agent_id: agent_id.clone(),
            memory_type,
            memory_id: memory_id.to_string(),
        };

        self.send_json(Method::DELETE, &["agent", "delete"], &request)
            .await
            .inspect_err(|err| error!("Error deleting memory: {}", err.detail()))
    }

    // Segments are appended to the base path and percent-encoded individually.
    fn endpoint(&self, segments: &[&str]) -> RequestResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "agent service request");
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: RequestResult<Url>) -> RequestResult<T> {
        let response = execute(self.request(Method::GET, url?)).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> RequestResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, segments, body).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> RequestResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = execute(self.request(method, url).json(body)).await?;
        Ok(response.json().await?)
    }
}

async fn execute(builder: RequestBuilder) -> RequestResult<Response> {
    let response = builder.send().await?;
    let status = response.status();

    if !status.is_success() {
        let payload = match response.text().await {
            Ok(body) => error_payload(body),
            Err(err) => {
                debug!(%status, error = %err, "could not read error body");
                None
            }
        };
        return Err(RequestError::Remote { status, payload });
    }

    Ok(response)
}

// Non-JSON error bodies are kept verbatim as a JSON string; an empty body is no payload.
fn error_payload(body: String) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}

fn normalize_base_url(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}
