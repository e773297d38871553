use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    screen_time::{entities::RawDayEntry, entry_form::Submission, limit::Limit},
    todo::entities::Task,
    utils::time::format_date,
};

use super::{
    dto::{
        ErrorBody, LimitBody, PriorityUpdate, StatusUpdate, TaskEdit, TaskKey, TasksResponse,
        UsageResponse,
    },
    ApiError, DetoxApi,
};

const TRACKER: &str = "tracker";
const LIMIT: &str = "tracker/limit";
const TODO_LIST: &str = "toDoList";
const TODO_UPDATE: &str = "toDoList/update";

/// [DetoxApi] over HTTP. Every request is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        // paths are joined relative to the base, which needs a trailing slash to keep its last
        // segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Request {
                call: "client setup",
                source,
            })?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Request { call, source })?;

        let status = response.status();
        if status.is_success() {
            debug!("{call} returned {status}");
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|v| v.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        warn!("{call} returned {status}: {message}");
        Err(ApiError::Status {
            call,
            status,
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            call,
            reason: e.to_string(),
        })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call).await?;
        // the call already succeeded, an unreadable body doesn't change that
        if let Err(e) = response.bytes().await {
            debug!("{call} body couldn't be read {e}");
        }
        Ok(())
    }
}

#[async_trait]
impl DetoxApi for HttpApi {
    #[instrument(skip(self))]
    async fn fetch_usage(&self) -> Result<Vec<RawDayEntry>, ApiError> {
        let response: UsageResponse = self
            .get_json(self.client.get(self.endpoint(TRACKER)?), "GET /tracker")
            .await?;
        Ok(response.data)
    }

    #[instrument(skip(self, submission), fields(date = %submission.date))]
    async fn submit_usage(&self, submission: &Submission) -> Result<(), ApiError> {
        self.send_without_body(
            self.client.post(self.endpoint(TRACKER)?).json(submission),
            "POST /tracker",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn fetch_limit(&self) -> Result<Option<Limit>, ApiError> {
        let result: Result<LimitBody, ApiError> = self
            .get_json(self.client.get(self.endpoint(LIMIT)?), "GET /tracker/limit")
            .await;
        match result {
            Ok(body) => Limit::new(body.limited_usage)
                .map(Some)
                .map_err(|e| ApiError::Decode {
                    call: "GET /tracker/limit",
                    reason: e.to_string(),
                }),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn update_limit(&self, limit: Limit) -> Result<(), ApiError> {
        self.send_without_body(
            self.client.put(self.endpoint(LIMIT)?).json(&LimitBody {
                limited_usage: *limit,
            }),
            "PUT /tracker/limit",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response: TasksResponse = self
            .get_json(self.client.get(self.endpoint(TODO_LIST)?), "GET /toDoList")
            .await?;
        Ok(response.into_tasks())
    }

    #[instrument(skip(self, task), fields(task = %task.task_name))]
    async fn create_task(&self, task: &Task) -> Result<(), ApiError> {
        self.send_without_body(
            self.client.post(self.endpoint(TODO_LIST)?).json(task),
            "POST /toDoList",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_task_status(&self, task_name: &str, status: bool) -> Result<(), ApiError> {
        self.send_without_body(
            self.client
                .put(self.endpoint(TODO_LIST)?)
                .json(&StatusUpdate { task_name, status }),
            "PUT /toDoList",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_task_priority(&self, task_name: &str, priority: bool) -> Result<(), ApiError> {
        self.send_without_body(
            self.client
                .put(self.endpoint(TODO_LIST)?)
                .json(&PriorityUpdate {
                    task_name,
                    priority,
                }),
            "PUT /toDoList",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, task_name: &str) -> Result<(), ApiError> {
        self.send_without_body(
            self.client
                .delete(self.endpoint(TODO_LIST)?)
                .json(&TaskKey { task_name }),
            "DELETE /toDoList",
        )
        .await
    }

    #[instrument(skip(self))]
    async fn edit_task(
        &self,
        old_task_name: &str,
        new_task_name: &str,
        new_due_date: Option<NaiveDate>,
    ) -> Result<(), ApiError> {
        self.send_without_body(
            self.client
                .put(self.endpoint(TODO_UPDATE)?)
                .json(&TaskEdit {
                    old_task_name,
                    new_task_name,
                    new_due_date: new_due_date.map(format_date).unwrap_or_default(),
                }),
            "PUT /toDoList/update",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use reqwest::StatusCode;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use crate::{
        api::{ApiError, DetoxApi},
        screen_time::limit::Limit,
    };

    use super::HttpApi;

    /// Serves a single canned response and hands back the raw request it received.
    async fn serve_once(status: &str, body: &str) -> Result<(String, JoinHandle<String>)> {
        serve_raw(format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
        .await
    }

    async fn serve_raw(response: String) -> Result<(String, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/api", listener.local_addr()?);
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 4096];
            loop {
                let read = socket.read(&mut buffer).await.unwrap();
                request.extend_from_slice(&buffer[..read]);
                if read == 0 || is_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        Ok((url, handle))
    }

    fn is_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|v| {
                let (name, value) = v.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    fn api(url: &str) -> HttpApi {
        HttpApi::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_usage_below_base_path() -> Result<()> {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"data":[{"date":"2024-01-01","entries":[{"category":"Other","timeSpent":2}]}]}"#,
        )
        .await?;

        let usage = api(&url).fetch_usage().await?;
        let request = server.await?;

        assert!(request.starts_with("GET /api/tracker HTTP/1.1"));
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].entries[0].time_spent, 2.);
        Ok(())
    }

    #[tokio::test]
    async fn missing_limit_is_none() -> Result<()> {
        let (url, server) = serve_once("404 Not Found", r#"{"message":"no limit"}"#).await?;
        assert_eq!(api(&url).fetch_limit().await?, None);
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn updates_limit_with_camel_case_body() -> Result<()> {
        let (url, server) = serve_once("200 OK", "{}").await?;
        api(&url).update_limit(Limit::new(4.5)?).await?;
        let request = server.await?;

        assert!(request.starts_with("PUT /api/tracker/limit HTTP/1.1"));
        assert!(request.ends_with(r#"{"limitedUsage":4.5}"#));
        Ok(())
    }

    #[tokio::test]
    async fn server_message_is_surfaced() -> Result<()> {
        let (url, server) =
            serve_once("400 Bad Request", r#"{"message":"Entry already exists"}"#).await?;
        let error = api(&url).delete_task("Walk").await.unwrap_err();
        let request = server.await?;

        assert!(request.starts_with("DELETE /api/toDoList HTTP/1.1"));
        assert!(request.ends_with(r#"{"task_name":"Walk"}"#));
        match error {
            ApiError::Status {
                status, message, ..
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Entry already exists");
            }
            other => panic!("unexpected error {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn edit_sends_plain_due_date() -> Result<()> {
        let (url, server) = serve_once("200 OK", "").await?;
        api(&url)
            .edit_task("Walk", "Run", chrono::NaiveDate::from_ymd_opt(2024, 8, 1))
            .await?;
        let request = server.await?;

        assert!(request.starts_with("PUT /api/toDoList/update HTTP/1.1"));
        assert!(request.ends_with(
            r#"{"old_task_name":"Walk","new_task_name":"Run","new_due_date":"2024-08-01"}"#
        ));
        Ok(())
    }

    #[tokio::test]
    async fn accepted_call_with_truncated_body_succeeds() -> Result<()> {
        let (url, server) = serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Length: 64\r\nConnection: close\r\n\r\n{\"ok\"".into(),
        )
        .await?;

        api(&url).set_task_status("Walk", true).await?;
        let request = server.await?;

        assert!(request.starts_with("PUT /api/toDoList HTTP/1.1"));
        assert!(request.ends_with(r#"{"task_name":"Walk","status":true}"#));
        Ok(())
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpApi::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
