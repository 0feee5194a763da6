use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mango::utils::{OutputFormat, OutputFormatter};
use mango::{ClientConfig, ConfigLoader, Mango, StoryState};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API token (overrides MANGO_TOKEN and mango.toml)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Project id (overrides MANGO_PROJECT_ID and mango.toml)
    #[arg(long, global = true)]
    pub project_id: Option<String>,

    /// API root, defaults to the public Pivotal Tracker v5 endpoint
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file to use instead of searching for mango.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print raw JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the project
    Project,
    /// List stories, optionally only those in one state
    Stories {
        #[arg(long)]
        state: Option<String>,
    },
    /// Move a story to another state
    SetState { story_id: String, state: String },
    /// List the tasks of a story
    Tasks { story_id: String },
    /// Print stories as Cucumber feature text
    Convert {
        #[arg(long)]
        state: Option<String>,
    },
    /// List valid story states
    States,
}

impl Cli {
    fn overrides(&self) -> ClientConfig {
        ClientConfig {
            token: self.token.clone(),
            project_id: self.project_id.clone(),
            base_url: self.base_url.clone(),
        }
    }

    fn formatter(&self) -> OutputFormatter {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        };
        OutputFormatter::new(format)
    }

    fn client(&self) -> Result<Mango> {
        let config = ConfigLoader::resolve(self.config.clone(), self.overrides())?;
        Ok(Mango::new(config)?)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let formatter = cli.formatter();

    match &cli.command {
        Commands::Project => {
            let mut client = cli.client()?;
            let project = client.get_project().await?;
            println!("{}", formatter.format_project(project)?);
        }
        Commands::Stories { state } => {
            let mut client = cli.client()?;
            let stories = fetch_stories(&mut client, state.as_deref()).await?;
            println!("{}", formatter.format_stories(stories)?);
        }
        Commands::SetState { story_id, state } => {
            let story = cli.client()?.set_story_state(story_id, state).await?;
            println!("{}", formatter.format_story_update(&story)?);
        }
        Commands::Tasks { story_id } => {
            let tasks = cli.client()?.get_story_tasks(story_id).await?;
            println!("{}", formatter.format_tasks(&tasks)?);
        }
        Commands::Convert { state } => {
            let mut client = cli.client()?;
            fetch_stories(&mut client, state.as_deref()).await?;
            print!("{}", client.convert_stories()?);
        }
        Commands::States => {
            for state in StoryState::ALL {
                println!("{}", state);
            }
        }
    }

    Ok(())
}

async fn fetch_stories<'a>(
    client: &'a mut Mango,
    state: Option<&str>,
) -> mango::Result<&'a [serde_json::Value]> {
    match state {
        Some(state) => client.get_stories_by_state(state).await,
        None => client.get_stories().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stories_with_state() {
        let cli = Cli::parse_from(["mango", "stories", "--state", "started"]);
        match cli.command {
            Commands::Stories { state } => assert_eq!(state.as_deref(), Some("started")),
            _ => panic!("Expected stories command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "mango",
            "set-state",
            "123",
            "accepted",
            "--token",
            "abc",
            "--project-id",
            "42",
            "--json",
        ]);

        assert!(cli.json);
        let overrides = cli.overrides();
        assert_eq!(overrides.token.as_deref(), Some("abc"));
        assert_eq!(overrides.project_id.as_deref(), Some("42"));
        assert_eq!(overrides.base_url, None);
        match cli.command {
            Commands::SetState { story_id, state } => {
                assert_eq!(story_id, "123");
                assert_eq!(state, "accepted");
            }
            _ => panic!("Expected set-state command"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["mango"]).is_err());
    }
}
