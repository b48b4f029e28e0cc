//! Typed helpers for the server's REST routes.

#[cfg(test)]
#[path = "api_routes_test.rs"]
mod api_routes_test;

use super::{ApiClient, ApiError};
use crate::net::transport::Transport;
use crate::net::types::{
    AgentRun, ApiResponse, AuthResult, AuthStart, CreateProjectRequest, Project, QueueRunRequest, User,
};

pub const ME_PATH: &str = "/me";

fn auth_callback_path(code: &str, state: &str) -> String {
    format!(
        "/auth/github/callback?code={}&state={}",
        urlencoding::encode(code),
        urlencoding::encode(state)
    )
}

fn agent_runs_path(project_id: i64) -> String {
    format!("/projects/{project_id}/agents/runs")
}

fn agent_run_path(project_id: i64, run_id: i64) -> String {
    format!("/projects/{project_id}/agents/runs/{run_id}")
}

fn queue_agent_run_path(project_id: i64) -> String {
    format!("/projects/{project_id}/agents/run")
}

impl<T: Transport> ApiClient<T> {
    /// Begin the GitHub OAuth flow via `GET /auth/github/start`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn auth_start(&self) -> Result<ApiResponse<AuthStart>, ApiError> {
        self.get("/auth/github/start").await
    }

    /// Exchange an OAuth `code`/`state` pair via `GET /auth/github/callback`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn auth_callback(&self, code: &str, state: &str) -> Result<ApiResponse<AuthResult>, ApiError> {
        self.get(&auth_callback_path(code, state)).await
    }

    /// Fetch the authenticated user via `GET /me`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn me(&self) -> Result<ApiResponse<User>, ApiError> {
        self.get(ME_PATH).await
    }

    /// `GET /projects`; `meta.count` carries the list length.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn list_projects(&self) -> Result<ApiResponse<Vec<Project>>, ApiError> {
        self.get("/projects").await
    }

    /// `POST /projects`; `meta` may carry `scaffold_path` and `repo_url`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post`].
    pub async fn create_project(&self, req: &CreateProjectRequest) -> Result<ApiResponse<Project>, ApiError> {
        self.post("/projects", req).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::post`].
    pub async fn queue_agent_run(
        &self,
        project_id: i64,
        req: &QueueRunRequest,
    ) -> Result<ApiResponse<AgentRun>, ApiError> {
        self.post(&queue_agent_run_path(project_id), req).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_agent_run(&self, project_id: i64, run_id: i64) -> Result<ApiResponse<AgentRun>, ApiError> {
        self.get(&agent_run_path(project_id, run_id)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn list_agent_runs(&self, project_id: i64) -> Result<ApiResponse<Vec<AgentRun>>, ApiError> {
        self.get(&agent_runs_path(project_id)).await
    }
}
