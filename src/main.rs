mod client;
mod config;
mod feed;
mod net;
mod storage;
mod workspaces;

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use time::{OffsetDateTime, UtcOffset};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use crate::client::FeedClient;
use crate::config::Config;
use crate::feed::FeedError;
use crate::feed::groups::{group_label, is_group_boundary};
use crate::feed::poll::PollScheduler;
use crate::feed::send::NoticeKind;
use crate::net::api::{ApiError, HttpApi, WorkspaceApi};
use crate::net::types::{MessageKind, Workspace, WorkspaceKind};
use crate::storage::StateFile;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no workspaces found; create one with `chatfeed create <name>`")]
    NoWorkspaces,
}

#[derive(Parser, Debug)]
#[command(name = "chatfeed", about = "Workspace chat feed client")]
struct Cli {
    /// Chat server base URL.
    #[arg(long, env = "CHATFEED_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List workspaces.
    Workspaces,
    /// Create a workspace and display it.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Create a private workspace (default is public).
        #[arg(long)]
        private: bool,
    },
    /// Show a workspace's messages once.
    Show {
        /// Workspace id; defaults to the last selected, then the first listed.
        #[arg(long, env = "CHATFEED_WORKSPACE")]
        workspace: Option<String>,
        /// Filter messages by a search term.
        #[arg(long)]
        search: Option<String>,
        /// Page backwards until the whole history is loaded.
        #[arg(long)]
        all: bool,
    },
    /// Follow a workspace feed live, with background refresh and sending.
    Follow {
        #[arg(long, env = "CHATFEED_WORKSPACE")]
        workspace: Option<String>,
        /// Author name for sent messages.
        #[arg(long, env = "CHATFEED_AUTHOR", default_value = "")]
        author: String,
        /// Refresh interval override in seconds.
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Start with auto-refresh off.
        #[arg(long)]
        no_refresh: bool,
    },
    /// Send a single message.
    Send {
        content: String,
        #[arg(long, env = "CHATFEED_WORKSPACE")]
        workspace: Option<String>,
        #[arg(long, env = "CHATFEED_AUTHOR", default_value = "")]
        author: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Command::Workspaces => run_workspaces(&config).await,
        Command::Create { name, description, private } => {
            run_create(&config, &name, description.as_deref(), private).await
        }
        Command::Show { workspace, search, all } => {
            run_show(&config, workspace.as_deref(), search, all).await
        }
        Command::Follow { workspace, author, interval_secs, no_refresh } => {
            run_follow(&config, workspace.as_deref(), &author, interval_secs, no_refresh).await
        }
        Command::Send { content, workspace, author } => {
            run_send(&config, workspace.as_deref(), &content, &author).await
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_workspaces(config: &Config) -> Result<(), CliError> {
    let api = HttpApi::new(&config.base_url);
    let state = StateFile::new(&config.state_file);
    let stored = state.last_workspace();

    let listed = api.list_workspaces().await?;
    if listed.is_empty() {
        return Err(CliError::NoWorkspaces);
    }
    for ws in &listed {
        let marker = if stored.as_deref() == Some(ws.id.as_str()) { "*" } else { " " };
        let kind = match ws.kind {
            WorkspaceKind::Public => "public",
            WorkspaceKind::Private => "private",
        };
        println!("{marker} {} [{kind}] {}", ws.id, ws.name);
    }
    Ok(())
}

async fn run_create(
    config: &Config,
    name: &str,
    description: Option<&str>,
    private: bool,
) -> Result<(), CliError> {
    let kind = if private { WorkspaceKind::Private } else { WorkspaceKind::Public };
    let draft = workspaces::draft(name, description, kind)?;

    let api = HttpApi::new(&config.base_url);
    let created = api.create_workspace(&draft).await?;
    println!("Workspace \"{}\" created successfully! (id {})", created.name, created.id);

    let state = StateFile::new(&config.state_file);
    if let Err(err) = state.store_last_workspace(&created.id) {
        warn!(error = %err, "could not persist workspace selection");
    }
    println!("Send a message with: chatfeed send --workspace {} <content>", created.id);
    Ok(())
}

async fn run_show(
    config: &Config,
    workspace: Option<&str>,
    search: Option<String>,
    all: bool,
) -> Result<(), CliError> {
    let (mut client, workspace) = open_client(config, workspace).await?;
    if all {
        while client.load_older().await? {}
    }
    if let Some(term) = search {
        client.query.search_term = term;
    }
    render(&client, &workspace);
    Ok(())
}

async fn run_send(
    config: &Config,
    workspace: Option<&str>,
    content: &str,
    author: &str,
) -> Result<(), CliError> {
    let (mut client, _workspace) = open_client(config, workspace).await?;
    client.send(content, author).await?;
    println!("Message sent");
    Ok(())
}

async fn run_follow(
    config: &Config,
    workspace: Option<&str>,
    author: &str,
    interval_secs: Option<u64>,
    no_refresh: bool,
) -> Result<(), CliError> {
    let (mut client, workspace) = open_client(config, workspace).await?;
    client.query.auto_refresh_enabled = !no_refresh;
    render(&client, &workspace);
    println!("commands: /more /search <term> /refresh /pause /resume /quit; anything else sends");

    let interval = interval_secs.map_or(config.poll_interval, Duration::from_secs);
    let mut scheduler = PollScheduler::new(interval);
    let (tick_tx, mut ticks) = mpsc::channel(1);
    scheduler.start(tick_tx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            tick = ticks.recv() => {
                if tick.is_none() {
                    break;
                }
                if client.query.auto_refresh_enabled && client.refresh().await {
                    render(&client, &workspace);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_input(&mut client, &workspace, author, line.trim()).await {
                    break;
                }
            }
        }
    }
    scheduler.stop();
    Ok(())
}

/// Follow-mode input dispatch. Returns false to quit.
async fn handle_input(client: &mut FeedClient, workspace: &Workspace, author: &str, input: &str) -> bool {
    match input {
        "" => {}
        "/quit" | "/q" => return false,
        "/refresh" => {
            if client.refresh().await {
                render(client, workspace);
            } else {
                println!("(refresh skipped or failed; feed unchanged)");
            }
        }
        "/more" => {
            // Anchor the view at the current head so the re-render shows
            // where the older page was inserted.
            client.query.scroll_anchor = client.displayed().first().map(|m| m.id.clone());
            match client.load_older().await {
                Ok(true) => render(client, workspace),
                Ok(false) => println!("(no more messages)"),
                Err(err) => println!("! {err}"),
            }
        }
        "/pause" => {
            client.query.auto_refresh_enabled = false;
            println!("(auto-refresh off)");
        }
        "/resume" => {
            client.query.auto_refresh_enabled = true;
            println!("(auto-refresh on)");
        }
        "/search" => {
            client.query.search_term.clear();
            render(client, workspace);
        }
        term if term.starts_with("/search ") => {
            client.query.search_term = term["/search ".len()..].trim().to_owned();
            render(client, workspace);
        }
        content => match client.send(content, author).await {
            Ok(_) => render(client, workspace),
            Err(err) => {
                println!("! {err}");
                if let Some(draft) = client.sender.take_restored_draft() {
                    println!("(draft kept) > {draft}");
                }
                render(client, workspace);
            }
        },
    }
    true
}

// =============================================================================
// HELPERS
// =============================================================================

/// Resolve the active workspace (explicit id, then persisted selection, then
/// first listed), persist the choice, and load its first page.
async fn open_client(config: &Config, explicit: Option<&str>) -> Result<(FeedClient, Workspace), CliError> {
    let api = Arc::new(HttpApi::new(&config.base_url));
    let state = StateFile::new(&config.state_file);
    let stored = state.last_workspace();

    let listed = api.list_workspaces().await?;
    let workspace = workspaces::choose(&listed, explicit, stored.as_deref())
        .ok_or(CliError::NoWorkspaces)?
        .clone();
    if let Err(err) = state.store_last_workspace(&workspace.id) {
        warn!(error = %err, "could not persist workspace selection");
    }

    let mut client = FeedClient::new(api);
    client.open(&workspace.id).await?;
    Ok((client, workspace))
}

fn render(client: &FeedClient, workspace: &Workspace) {
    let now = OffsetDateTime::now_utc();
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let shown = client.displayed();

    println!();
    println!("=== {} ===", workspace.name);
    if shown.is_empty() {
        if client.query.search_term.trim().is_empty() {
            println!("No messages yet. Be the first to send a message!");
        } else {
            println!("No messages match \"{}\".", client.query.search_term);
        }
    }
    let anchor = client.query.scroll_anchor.as_deref();
    for (i, message) in shown.iter().enumerate() {
        if is_group_boundary(&shown, i, now, offset) {
            println!("-- {} --", group_label(message.created_at, now, offset));
        }
        if anchor == Some(message.id.as_str()) {
            println!("   ^ previously loaded from here");
        }
        let clock = format_clock(message.created_at, offset);
        let tag = match message.kind {
            MessageKind::Text => "",
            MessageKind::File => " [file]",
            MessageKind::System => " [system]",
        };
        let edited = if message.is_edited { " (edited)" } else { "" };
        println!("{clock} {}{tag}: {}{edited}", message.author.name, message.content);
    }

    if let Some(feed) = client.session.feed() {
        let mut footer = format!("{} of {} messages", feed.len(), feed.cursor.total_count());
        if feed.cursor.has_more() {
            footer.push_str("  (/more to load older)");
        }
        if let Some(at) = feed.last_refreshed_at() {
            footer.push_str(&format!("  refreshed {}", format_clock(at, offset)));
        }
        println!("{footer}");
    }
    if let Some(notice) = client.sender.notice(now) {
        match notice.kind {
            NoticeKind::Success => println!("+ {}", notice.text),
            NoticeKind::Error => println!("! {}", notice.text),
        }
    }
    let _ = std::io::stdout().flush();
}

fn format_clock(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}
