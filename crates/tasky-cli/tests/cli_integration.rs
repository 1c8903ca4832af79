use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn tasky(file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tasky").unwrap();
    cmd.env_remove("TASKY_DEBUG_LOG")
        .env_remove("OPENAI_API_KEY")
        .arg("--file")
        .arg(file);
    cmd
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_str(&String::from_utf8_lossy(output)).expect("Failed to parse JSON output")
}

fn run_ok(file: &Path, args: &[&str]) -> Value {
    let output = tasky(file)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json_output(&output);
    assert!(json["success"].as_bool().unwrap());
    json
}

fn extract_id(json: &Value) -> String {
    json["data"]["id"].as_i64().unwrap().to_string()
}

/// Board with a "Todo" list holding one task and an empty "Doing" list.
fn seed(file: &Path) -> (String, String, String, String) {
    let board = extract_id(&run_ok(file, &["board", "create", "--title", "Sprint 1"]));
    let todo = extract_id(&run_ok(
        file,
        &["list", "create", "--board-id", &board, "--name", "Todo"],
    ));
    let doing = extract_id(&run_ok(
        file,
        &["list", "create", "--board-id", &board, "--name", "Doing"],
    ));
    let task = extract_id(&run_ok(
        file,
        &[
            "task", "create", "--board-id", &board, "--list-id", &todo, "--title", "Write docs",
        ],
    ));
    (board, todo, doing, task)
}

fn counts(file: &Path, board: &str) -> Vec<(String, i64)> {
    let json = run_ok(file, &["board", "show", "--id", board]);
    json["data"]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["list_name"].as_str().unwrap().to_string(),
                c["count"].as_i64().unwrap(),
            )
        })
        .collect()
}

mod board_tests {
    use super::*;

    #[test]
    fn test_board_create() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        let json = run_ok(
            &file,
            &["board", "create", "--title", "Sprint 1", "--description", "First sprint"],
        );
        assert_eq!(json["data"]["title"], "Sprint 1");
        assert_eq!(json["data"]["description"], "First sprint");
        assert!(file.exists());
    }

    #[test]
    fn test_board_create_requires_title() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        tasky(&file)
            .args(["board", "create", "--title", "   "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Title is required"));
    }

    #[test]
    fn test_board_list_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        let json = run_ok(&file, &["board", "list"]);
        assert_eq!(json["data"]["count"], 0);
    }

    #[test]
    fn test_board_list_newest_first() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        run_ok(&file, &["board", "create", "--title", "Older"]);
        run_ok(&file, &["board", "create", "--title", "Newer"]);

        let json = run_ok(&file, &["board", "list"]);
        assert_eq!(json["data"]["count"], 2);
        assert_eq!(json["data"]["items"][0]["title"], "Newer");

        let json = run_ok(&file, &["board", "list", "--limit", "1", "--offset", "1"]);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["items"][0]["title"], "Older");
    }

    #[test]
    fn test_board_get_not_found() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        tasky(&file)
            .args(["board", "get", "--id", "99"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Board not found: 99"));
    }

    #[test]
    fn test_board_show_lists_counts_and_tasks() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, _, _) = seed(&file);

        let json = run_ok(&file, &["board", "show", "--id", &board]);
        assert_eq!(json["data"]["title"], "Sprint 1");
        assert_eq!(json["data"]["columns"][0]["tasks"][0]["title"], "Write docs");
        assert_eq!(
            counts(&file, &board),
            vec![("Todo".to_string(), 1), ("Doing".to_string(), 0)]
        );
    }

    #[test]
    fn test_board_show_rejects_invalid_id() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        tasky(&file)
            .args(["board", "show", "--id", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid board id"));
    }

    #[test]
    fn test_board_delete_cascades() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, _, _) = seed(&file);

        let json = run_ok(&file, &["board", "delete", "--id", &board]);
        assert_eq!(json["data"]["deleted"].as_i64().unwrap().to_string(), board);

        let json = run_ok(&file, &["board", "list"]);
        assert_eq!(json["data"]["count"], 0);
        let json = run_ok(&file, &["board", "show", "--id", &board]);
        assert!(json["data"]["columns"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_board_describe_requires_title() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        tasky(&file)
            .args(["board", "describe", "--title", " "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Title required"));
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn test_list_create_uses_list_name_field() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let board = extract_id(&run_ok(&file, &["board", "create", "--title", "B"]));

        let json = run_ok(
            &file,
            &["list", "create", "--board-id", &board, "--name", "  Backlog  "],
        );
        assert_eq!(json["data"]["list_name"], "Backlog");
        assert_eq!(json["data"]["board_id"].as_i64().unwrap().to_string(), board);
    }

    #[test]
    fn test_list_create_blank_name() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let board = extract_id(&run_ok(&file, &["board", "create", "--title", "B"]));

        tasky(&file)
            .args(["list", "create", "--board-id", &board, "--name", ""])
            .assert()
            .failure()
            .stderr(predicate::str::contains("List name is required"));
    }

    #[test]
    fn test_list_rename() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, todo, _, _) = seed(&file);

        let json = run_ok(
            &file,
            &["list", "rename", "--board-id", &board, "--id", &todo, "--name", "Ready"],
        );
        assert_eq!(json["data"]["list_name"], "Ready");
        assert_eq!(counts(&file, &board)[0], ("Ready".to_string(), 1));
    }

    #[test]
    fn test_list_delete_requires_confirmation() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, todo, _, _) = seed(&file);

        tasky(&file)
            .args(["list", "delete", "--board-id", &board, "--id", &todo])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "This will permanently delete “Todo” and 1 task(s) inside.",
            ))
            .stderr(predicate::str::contains("--yes"));

        assert_eq!(counts(&file, &board).len(), 2);
    }

    #[test]
    fn test_list_delete_confirmed_removes_tasks() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, todo, _, _) = seed(&file);

        run_ok(
            &file,
            &["list", "delete", "--board-id", &board, "--id", &todo, "--yes"],
        );

        assert_eq!(counts(&file, &board), vec![("Doing".to_string(), 0)]);
    }

    #[test]
    fn test_list_delete_unknown() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, _, _) = seed(&file);

        tasky(&file)
            .args(["list", "delete", "--board-id", &board, "--id", "999", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("List not found: 999"));
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn test_task_create_blank_title() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, todo, _, _) = seed(&file);

        tasky(&file)
            .args([
                "task", "create", "--board-id", &board, "--list-id", &todo, "--title", " ",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Task title is required"));
    }

    #[test]
    fn test_task_move_between_lists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, doing, task) = seed(&file);

        let json = run_ok(
            &file,
            &["task", "move", "--board-id", &board, "--id", &task, "--to-list", &doing],
        );
        assert_eq!(json["data"]["list_id"].as_i64().unwrap().to_string(), doing);
        assert_eq!(
            counts(&file, &board),
            vec![("Todo".to_string(), 0), ("Doing".to_string(), 1)]
        );
    }

    #[test]
    fn test_task_move_to_same_list_is_skipped() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, todo, _, task) = seed(&file);

        let json = run_ok(
            &file,
            &["task", "move", "--board-id", &board, "--id", &task, "--to-list", &todo],
        );
        assert_eq!(json["data"]["skipped"], "same_column");
    }

    #[test]
    fn test_task_move_unknown_task() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, doing, _) = seed(&file);

        tasky(&file)
            .args(["task", "move", "--board-id", &board, "--id", "999", "--to-list", &doing])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Task not found: 999"));
    }

    #[test]
    fn test_task_delete_requires_confirmation() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");
        let (board, _, _, task) = seed(&file);

        tasky(&file)
            .args(["task", "delete", "--board-id", &board, "--id", &task])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "This will permanently delete “Write docs”.",
            ));

        run_ok(
            &file,
            &["task", "delete", "--board-id", &board, "--id", &task, "--yes"],
        );
        assert_eq!(counts(&file, &board)[0], ("Todo".to_string(), 0));
    }
}

mod auth_tests {
    use super::*;

    #[test]
    fn test_whoami_with_local_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        let json = run_ok(&file, &["auth", "whoami"]);
        assert_eq!(json["data"]["full_name"], "Local user");
    }

    #[test]
    fn test_login_needs_hosted_backend() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tasky.json");

        tasky(&file)
            .args(["auth", "login", "--email", "ada@example.com", "--password", "secret-pass"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("hosted backend"));
    }
}

#[test]
fn test_completions() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tasky.json");

    tasky(&file)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasky"));
}
