//! Typed access to the `/students` endpoints.

use crate::error::ClientError;
use reqwest::{Client, Response};
use roster_types::{ErrorBody, MessageBody, Student, StudentInput, StudentPage, StudentWithMarks};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Operations the list view needs from the service.
pub trait StudentsApi {
    fn list(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<StudentPage, ClientError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<StudentWithMarks, ClientError>> + Send;

    fn create(
        &self,
        input: &StudentInput,
    ) -> impl Future<Output = Result<Student, ClientError>> + Send;

    fn update(
        &self,
        id: i64,
        input: &StudentInput,
    ) -> impl Future<Output = Result<Student, ClientError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<MessageBody, ClientError>> + Send;
}

/// [`StudentsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStudentsApi {
    client: Client,
    base_url: String,
}

impl HttpStudentsApi {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn students_url(&self) -> String {
        format!("{}/students", self.base_url)
    }

    fn student_url(&self, id: i64) -> String {
        format!("{}/students/{}", self.base_url, id)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response.json::<ErrorBody>().await.ok().map(|body| body.error);
    tracing::debug!(status = status.as_u16(), ?message, "request rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

impl StudentsApi for HttpStudentsApi {
    async fn list(&self, page: u32, limit: u32) -> Result<StudentPage, ClientError> {
        let response = self
            .client
            .get(self.students_url())
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        decode(response).await
    }

    async fn get(&self, id: i64) -> Result<StudentWithMarks, ClientError> {
        let response = self.client.get(self.student_url(id)).send().await?;
        decode(response).await
    }

    async fn create(&self, input: &StudentInput) -> Result<Student, ClientError> {
        let response = self
            .client
            .post(self.students_url())
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, id: i64, input: &StudentInput) -> Result<Student, ClientError> {
        let response = self
            .client
            .put(self.student_url(id))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: i64) -> Result<MessageBody, ClientError> {
        let response = self.client.delete(self.student_url(id)).send().await?;
        decode(response).await
    }
}
