use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tasky_core::{TaskyError, TaskyResult};
use tasky_domain::boards::SIGN_IN_REQUIRED;
use tasky_domain::validation::{required_text, LIST_NAME_REQUIRED, TASK_TITLE_REQUIRED};
use tasky_domain::{
    Board, BoardId, Column, ColumnId, ColumnWithTasks, Profile, RemoteGateway, Task, TaskId,
};

use super::auth::fetch_user;
use super::client::{send_empty, send_json, SupabaseClient, SINGLE_OBJECT};

const COLUMN_FIELDS: &str = "id,created_at,list_name,board_id";
const COLUMN_WITH_TASKS: &str =
    "id,created_at,list_name,board_id,tasks(id,created_at,title,content,image_url,list_id)";

fn eq(id: i64) -> String {
    format!("eq.{id}")
}

/// Row operations against the PostgREST tables `boards`, `lists` and `tasks`.
///
/// Deleting a board or list relies on the database's foreign-key cascade.
#[derive(Debug, Clone)]
pub struct SupabaseGateway {
    client: SupabaseClient,
}

impl SupabaseGateway {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

#[async_trait]
impl RemoteGateway for SupabaseGateway {
    async fn fetch_columns(
        &self,
        board_id: BoardId,
        with_tasks: bool,
    ) -> TaskyResult<Vec<ColumnWithTasks>> {
        let select = if with_tasks {
            COLUMN_WITH_TASKS
        } else {
            COLUMN_FIELDS
        };
        send_json(self.client.rest(Method::GET, "lists").query(&[
            ("select", select.to_string()),
            ("board_id", eq(board_id)),
            ("order", "created_at.asc".to_string()),
        ]))
        .await
    }

    async fn fetch_board(&self, board_id: BoardId) -> Option<Board> {
        let request = self
            .client
            .rest(Method::GET, "boards")
            .header("Accept", SINGLE_OBJECT)
            .query(&[("select", "*".to_string()), ("id", eq(board_id))]);
        match send_json(request).await {
            Ok(board) => Some(board),
            Err(e) => {
                tracing::warn!("Board {} metadata unavailable: {}", board_id, e);
                None
            }
        }
    }

    async fn list_boards(&self, limit: usize, offset: usize) -> TaskyResult<Vec<Board>> {
        send_json(self.client.rest(Method::GET, "boards").query(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ]))
        .await
    }

    async fn create_board(
        &self,
        title: String,
        description: Option<String>,
    ) -> TaskyResult<Board> {
        let user = fetch_user(&self.client)
            .await?
            .ok_or_else(|| TaskyError::Unauthenticated(SIGN_IN_REQUIRED.into()))?;

        let board: Board = send_json(
            self.client
                .rest(Method::POST, "boards")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("select", "*")])
                .json(&json!([{ "title": title, "description": description, "user_id": user.id }])),
        )
        .await?;
        tracing::info!("Created board {}", board.id);
        Ok(board)
    }

    async fn delete_board(&self, board_id: BoardId) -> TaskyResult<()> {
        send_empty(
            self.client
                .rest(Method::DELETE, "boards")
                .query(&[("id", eq(board_id))]),
        )
        .await
    }

    async fn create_column(&self, board_id: BoardId, name: String) -> TaskyResult<Column> {
        let name = required_text(&name, LIST_NAME_REQUIRED)?;
        send_json(
            self.client
                .rest(Method::POST, "lists")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("select", COLUMN_FIELDS)])
                .json(&json!([{ "board_id": board_id, "list_name": name }])),
        )
        .await
    }

    async fn rename_column(&self, column_id: ColumnId, name: String) -> TaskyResult<Column> {
        let name = required_text(&name, LIST_NAME_REQUIRED)?;
        send_json(
            self.client
                .rest(Method::PATCH, "lists")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("id", eq(column_id)), ("select", COLUMN_FIELDS.to_string())])
                .json(&json!({ "list_name": name })),
        )
        .await
    }

    async fn delete_column(&self, column_id: ColumnId) -> TaskyResult<()> {
        send_empty(
            self.client
                .rest(Method::DELETE, "lists")
                .query(&[("id", eq(column_id))]),
        )
        .await
    }

    async fn create_task(
        &self,
        column_id: ColumnId,
        title: String,
        content: Option<String>,
    ) -> TaskyResult<Task> {
        let title = required_text(&title, TASK_TITLE_REQUIRED)?;
        send_json(
            self.client
                .rest(Method::POST, "tasks")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("select", "*")])
                .json(&json!([{ "list_id": column_id, "title": title, "content": content }])),
        )
        .await
    }

    async fn move_task(&self, task_id: TaskId, column_id: ColumnId) -> TaskyResult<Task> {
        send_json(
            self.client
                .rest(Method::PATCH, "tasks")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("id", eq(task_id)), ("select", "*".to_string())])
                .json(&json!({ "list_id": column_id })),
        )
        .await
    }

    async fn delete_task(&self, task_id: TaskId) -> TaskyResult<Task> {
        if task_id <= 0 {
            return Err(TaskyError::Validation("Invalid task id".into()));
        }
        send_json(
            self.client
                .rest(Method::DELETE, "tasks")
                .header("Prefer", "return=representation")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("id", eq(task_id)), ("select", "*".to_string())]),
        )
        .await
    }

    async fn current_profile(&self) -> TaskyResult<Option<Profile>> {
        let Some(user) = fetch_user(&self.client).await? else {
            return Ok(None);
        };
        let profile = send_json(
            self.client
                .rest(Method::GET, "profiles")
                .header("Accept", SINGLE_OBJECT)
                .query(&[("select", "*".to_string()), ("id", format!("eq.{}", user.id))]),
        )
        .await?;
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasky_core::config::SupabaseSettings;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "6f1c2b1e-8f43-4c1a-9d55-3f0a2c8e7b10";

    fn gateway(server: &MockServer, token: Option<&str>) -> SupabaseGateway {
        SupabaseGateway::new(SupabaseClient::new(SupabaseSettings {
            url: server.uri(),
            anon_key: "anon-key".into(),
            access_token: token.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_fetch_columns_with_nested_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/lists"))
            .and(query_param("select", COLUMN_WITH_TASKS))
            .and(query_param("board_id", "eq.7"))
            .and(query_param("order", "created_at.asc"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "created_at": "2025-01-01T10:00:00Z",
                    "list_name": "Todo",
                    "board_id": 7,
                    "tasks": [{
                        "id": 10,
                        "created_at": "2025-01-01T11:00:00Z",
                        "title": "Write spec",
                        "content": null,
                        "image_url": null,
                        "list_id": 1
                    }]
                },
                {
                    "id": 2,
                    "created_at": "2025-01-01T10:05:00Z",
                    "list_name": "Doing",
                    "board_id": 7,
                    "tasks": []
                }
            ])))
            .mount(&server)
            .await;

        let rows = gateway(&server, None).fetch_columns(7, true).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].column.name, "Todo");
        assert_eq!(rows[0].tasks[0].column_id, 1);
        assert!(rows[1].tasks.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_board_suppresses_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/boards"))
            .and(header("accept", SINGLE_OBJECT))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;

        assert!(gateway(&server, None).fetch_board(99).await.is_none());
    }

    #[tokio::test]
    async fn test_list_boards_newest_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/boards"))
            .and(query_param("order", "created_at.desc"))
            .and(query_param("limit", "20"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 3,
                "title": "Sprint 1",
                "description": null,
                "user_id": USER_ID,
                "created_at": "2025-02-01T00:00:00Z"
            }])))
            .mount(&server)
            .await;

        let boards = gateway(&server, Some("jwt")).list_boards(20, 0).await.unwrap();
        assert_eq!(boards[0].title, "Sprint 1");
    }

    #[tokio::test]
    async fn test_create_board_requires_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = gateway(&server, None)
            .create_board("Sprint 1".into(), None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed to create board"), SIGN_IN_REQUIRED);
    }

    #[tokio::test]
    async fn test_create_board_inserts_for_current_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": USER_ID })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/boards"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!([{ "title": "Sprint 1", "description": "Two weeks", "user_id": USER_ID }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 5,
                "title": "Sprint 1",
                "description": "Two weeks",
                "user_id": USER_ID,
                "created_at": "2025-02-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let board = gateway(&server, Some("jwt"))
            .create_board("Sprint 1".into(), Some("Two weeks".into()))
            .await
            .unwrap();
        assert_eq!(board.id, 5);
    }

    #[tokio::test]
    async fn test_move_task_patches_list_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.10"))
            .and(body_json(json!({ "list_id": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 10,
                "created_at": "2025-01-01T11:00:00Z",
                "title": "Write spec",
                "content": null,
                "image_url": null,
                "list_id": 2
            })))
            .mount(&server)
            .await;

        let task = gateway(&server, Some("jwt")).move_task(10, 2).await.unwrap();
        assert_eq!(task.column_id, 2);
    }

    #[tokio::test]
    async fn test_provider_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/lists"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": "42501",
                "message": "permission denied for table lists"
            })))
            .mount(&server)
            .await;

        let err = gateway(&server, Some("jwt")).delete_column(3).await.unwrap_err();
        assert!(matches!(err, TaskyError::Remote(_)));
        assert_eq!(
            err.user_message("Failed to delete list"),
            "permission denied for table lists"
        );
    }

    #[tokio::test]
    async fn test_blank_names_make_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway(&server, Some("jwt"));
        let err = gateway.create_column(7, "   ".into()).await.unwrap_err();
        assert_eq!(err.user_message("x"), "List name is required");
        let err = gateway.rename_column(1, "".into()).await.unwrap_err();
        assert_eq!(err.user_message("x"), "List name is required");
        let err = gateway.create_task(1, " \t".into(), None).await.unwrap_err();
        assert_eq!(err.user_message("x"), "Task title is required");
    }

    #[tokio::test]
    async fn test_create_column_sends_trimmed_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/lists"))
            .and(body_json(json!([{ "board_id": 7, "list_name": "Todo" }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 3,
                "created_at": "2025-01-01T10:00:00Z",
                "list_name": "Todo",
                "board_id": 7
            })))
            .expect(1)
            .mount(&server)
            .await;

        let column = gateway(&server, Some("jwt"))
            .create_column(7, "  Todo ".into())
            .await
            .unwrap();
        assert_eq!(column.name, "Todo");
    }

    #[tokio::test]
    async fn test_delete_task_rejects_invalid_id() {
        let server = MockServer::start().await;
        let err = gateway(&server, None).delete_task(0).await.unwrap_err();
        assert!(matches!(err, TaskyError::Validation(_)));
    }

    #[tokio::test]
    async fn test_current_profile_signed_out() {
        let server = MockServer::start().await;
        assert_eq!(gateway(&server, None).current_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_current_profile_reads_profiles_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": USER_ID })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("id", format!("eq.{USER_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "full_name": "Ada Lovelace",
                "avatar_url": null
            })))
            .mount(&server)
            .await;

        let profile = gateway(&server, Some("jwt"))
            .current_profile()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.full_name, "Ada Lovelace");
    }
}
