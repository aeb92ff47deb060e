mod config;
mod error;
mod git;
mod jira;
mod markup;
mod workflow;

use std::path::{Path, PathBuf};

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{JtError, Result};
use crate::jira::JiraClient;

const API_TOKEN_URL: &str = "https://id.atlassian.com/manage/api-tokens";

#[derive(Parser)]
#[command(
  name = "jt",
  about = "jt - JIRA Issue Tool",
  long_about = "jt is a CLI tool for viewing and manipulating JIRA issues."
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Config file (default is $ATLASSIAN_CONFIG_FILE or ~/.config/jira)
  #[arg(long, global = true)]
  config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Save your JIRA config for use in other commands
  Config,
  #[command(flatten)]
  Issue(IssueCommand),
}

#[derive(Subcommand)]
enum IssueCommand {
  /// What The Issue? - View an issue
  Wti {
    #[command(flatten)]
    target: Target,
    /// Do not print the title
    #[arg(short = 't', long)]
    no_title: bool,
    /// Do not print the description
    #[arg(short = 'd', long)]
    no_description: bool,
  },
  /// Transition an issue to Blocked status
  Block(Target),
  /// Transition an issue to To Do status
  Todo(Target),
  /// Transition an issue to Review status
  Review(Target),
  /// Transition an issue to Deployed / Done status
  Done(Target),
  /// Transition an issue to the named status
  Status {
    /// Target status name, e.g. "In Progress"
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    name: String,
    #[command(flatten)]
    target: Target,
  },
  /// Assign an issue to you
  Take(Target),
  /// Self-assign and transition an issue to In Progress status
  Onit(Target),
}

#[derive(Args)]
struct Target {
  /// Issue key or browse URL; defaults to the key in the current git branch
  issue: Option<String>,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  if let Err(e) = run(cli).await {
    error!("{e}");
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  let config_path = match cli.config {
    Some(path) => path,
    None => Config::default_path()?,
  };

  match cli.command {
    Commands::Config => cmd_config(&config_path),
    Commands::Issue(command) => {
      let config = Config::load(&config_path)?;
      config.validate()?;
      let client = JiraClient::new(&config)?;
      run_issue_command(command, &config, &client).await
    }
  }
}

async fn run_issue_command(command: IssueCommand, config: &Config, client: &JiraClient) -> Result<()> {
  match command {
    IssueCommand::Wti {
      target,
      no_title,
      no_description,
    } => cmd_wti(client, config, &target, no_title, no_description).await,
    IssueCommand::Block(target) => cmd_move(client, config, &target, workflow::BLOCKED).await,
    IssueCommand::Todo(target) => cmd_move(client, config, &target, workflow::TO_DO).await,
    IssueCommand::Review(target) => cmd_move(client, config, &target, workflow::IN_REVIEW).await,
    IssueCommand::Done(target) => cmd_move(client, config, &target, workflow::DONE).await,
    IssueCommand::Status { name, target } => cmd_move(client, config, &target, &name).await,
    IssueCommand::Take(target) => cmd_take(client, config, &target).await,
    IssueCommand::Onit(target) => cmd_onit(client, config, &target).await,
  }
}

/// Issue key from the argument, or from the current branch when none was given.
fn resolve_key(target: &Target, config: &Config) -> Result<String> {
  match target.issue.as_deref() {
    Some(raw) => jira::key::parse_issue_key(raw, &config.host)
      .ok_or_else(|| JtError::NoIssueKey(raw.to_string())),
    None => {
      let branch = git::branch::current_branch(Path::new("."))?;
      let key = jira::key::key_from_branch(&branch, &config.branch_prefix)
        .ok_or(JtError::NoIssueKey(branch))?;
      info!("using issue {key} from current branch");
      Ok(key)
    }
  }
}

async fn cmd_wti(
  client: &JiraClient,
  config: &Config,
  target: &Target,
  no_title: bool,
  no_description: bool,
) -> Result<()> {
  let key = resolve_key(target, config)?;
  let issue = client.get_issue(&key).await?;

  if !no_title {
    println!("{issue}");
    println!();
  }
  if !no_description {
    let description = issue.fields.description.as_deref().unwrap_or_default();
    println!("{}", markup::render(client, description).await);
  }

  Ok(())
}

async fn cmd_move(client: &JiraClient, config: &Config, target: &Target, status: &str) -> Result<()> {
  let key = resolve_key(target, config)?;
  let issue = client.get_issue(&key).await?;
  let change = workflow::transition::move_to_status(client, &issue, status).await?;
  println!("{change}");
  Ok(())
}

async fn cmd_take(client: &JiraClient, config: &Config, target: &Target) -> Result<()> {
  let key = resolve_key(target, config)?;
  let issue = client.get_issue(&key).await?;
  let outcome = workflow::assign::assign_to_self(client, &issue).await?;
  println!("{outcome}");
  Ok(())
}

async fn cmd_onit(client: &JiraClient, config: &Config, target: &Target) -> Result<()> {
  let key = resolve_key(target, config)?;
  let issue = client.get_issue(&key).await?;

  let change = workflow::transition::move_to_status(client, &issue, workflow::IN_PROGRESS).await?;
  println!("{change}");

  let outcome = workflow::assign::assign_to_self(client, &issue).await?;
  println!("{outcome}");
  Ok(())
}

fn cmd_config(path: &Path) -> Result<()> {
  let theme = ColorfulTheme::default();

  println!("It looks like we need a Jira API Token.");
  println!("First, go to {API_TOKEN_URL} to create a personal api token.");
  println!();

  let token = Password::with_theme(&theme)
    .with_prompt("API token")
    .interact()?;
  let host: String = Input::with_theme(&theme)
    .with_prompt("Host URL like https://tenant.atlassian.net")
    .interact_text()?;
  let user: String = Input::with_theme(&theme)
    .with_prompt("Email")
    .interact_text()?;

  let config = Config {
    host: host.trim().trim_end_matches('/').to_string(),
    user: user.trim().to_string(),
    token: token.trim().to_string(),
    ..Config::default()
  };
  config.validate()?;

  if let Some(backup) = Config::backup(path)? {
    println!("Backed up previous config to {}", backup.display());
  }
  config.save(path)?;

  println!("Successfully wrote config to {}", path.display());
  Ok(())
}
