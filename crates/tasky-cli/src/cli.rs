use clap::{Args, Parser, Subcommand};
use tasky_domain::{BoardId, ColumnId, TaskId, DEFAULT_BOARD_PAGE};

#[derive(Parser)]
#[command(name = "tasky")]
#[command(about = "A Kanban task board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Use a local JSON file instead of the hosted backend (or set TASKY_FILE)
    #[arg(long, value_name = "FILE", env = "TASKY_FILE", global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// List (column) operations
    List(ListCommand),
    /// Task operations
    Task(TaskCommand),
    /// Sign in, register and inspect the session
    Auth(AuthCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List your boards, newest first
    List {
        #[arg(long, default_value_t = DEFAULT_BOARD_PAGE)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Get board metadata
    Get {
        #[arg(long)]
        id: BoardId,
    },
    /// Delete a board with its lists and tasks
    Delete {
        #[arg(long)]
        id: BoardId,
    },
    /// Show a board with its lists, counts and tasks
    Show {
        #[arg(long)]
        id: BoardId,
    },
    /// Suggest a description for a board title
    Describe {
        #[arg(long)]
        title: String,
        /// Address of a running tasky-server (defaults to TASKY_SERVER_ADDR)
        #[arg(long)]
        server: Option<String>,
    },
}

// List commands
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Create a new list
    Create {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        name: String,
    },
    /// Rename a list
    Rename {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: ColumnId,
        #[arg(long)]
        name: String,
    },
    /// Delete a list and its tasks
    Delete {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: ColumnId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

// Task commands
#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        list_id: ColumnId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Move a task to another list
    Move {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: TaskId,
        #[arg(long)]
        to_list: ColumnId,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        board_id: BoardId,
        #[arg(long)]
        id: TaskId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

// Auth commands
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// End the session
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long, env = "TASKY_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
}
