use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use super::logging::{LogTarget, build_filter, init_logging};
use crate::config::Settings;
use crate::details::DetailsCard;
use crate::grouping::{GroupingStats, group_with_stats};
use crate::models::{Conversation, Interaction};
use crate::navigation::{SessionSync, read_session_param, shareable_url, write_session_param};
use crate::parsers::{LoadOptions, load_conversations_with};
use crate::tui::{Loader, run_interactive};
use crate::utils::{format_path_with_tilde, get_config_path, strip_ansi_codes};

#[derive(Parser)]
#[command(name = "transcript-navigator")]
#[command(version)]
#[command(
    about = "Browse customer/agent conversation transcripts one interaction at a time",
    long_about = None
)]
pub struct Cli {
    /// Snapshot file (.json or .jsonl) or a directory of snapshots
    #[arg(long, global = true, env = "TRANSCRIPT_NAVIGATOR_DATA")]
    pub data: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Open on this session id
    #[arg(long, global = true, conflicts_with = "url")]
    pub session: Option<String>,

    /// Viewer URL; its session_id parameter selects the session
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Base URL for shareable links
    #[arg(long, global = true, env = "TRANSCRIPT_NAVIGATOR_BASE_URL")]
    pub base_url: Option<String>,

    /// Log filter, e.g. "debug" or "transcript_navigator=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse conversations interactively
    Browse,
    /// Show statistics about the loaded conversations
    Stats,
    /// Print one conversation's interactions (first conversation unless --session or --index)
    Show {
        /// 1-based position in the ordered conversation list
        #[arg(long)]
        index: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the shareable link for a session
    Link {
        session_id: String,
    },
}

/// Effective options after flags, environment and config file are merged
struct RunContext {
    settings: Settings,
    session: Option<String>,
    url: Option<String>,
}

impl RunContext {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                path.clone()
            }
            None => get_config_path()?,
        };

        let mut settings = Settings::load_from(&config_path)?;
        if let Some(data) = &cli.data {
            settings.data_path = Some(data.clone());
        }
        if let Some(base_url) = &cli.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(log_file) = &cli.log_file {
            settings.log_file = Some(log_file.clone());
        }

        let session = cli
            .session
            .clone()
            .filter(|session| !session.is_empty())
            .or_else(|| cli.url.as_deref().and_then(read_session_param));

        Ok(Self { settings, session, url: cli.url.clone() })
    }

    fn data_path(&self) -> Result<&Path> {
        match &self.settings.data_path {
            Some(path) => Ok(path.as_path()),
            None => bail!(
                "No data source configured. Pass --data, set TRANSCRIPT_NAVIGATOR_DATA, or add data_path to the config file"
            ),
        }
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions { max_file_size: self.settings.max_file_size_bytes }
    }

    fn load(&self) -> Result<Vec<Conversation>> {
        load_conversations_with(self.data_path()?, &self.load_options())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let context = RunContext::from_cli(&cli)?;

    let filter = build_filter(cli.log_level.as_deref(), &context.settings.log_level)?;
    let target = match (&context.settings.log_file, &cli.command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Some(Commands::Browse)) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    };
    init_logging(filter, target)?;

    match &cli.command {
        Some(Commands::Browse) => browse(&context)?,
        Some(Commands::Stats) => show_stats(&context)?,
        Some(Commands::Show { index, json }) => show_conversation(&context, *index, *json)?,
        Some(Commands::Link { session_id }) => {
            println!("{}", shareable_url(&context.settings.base_url, session_id));
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn browse(context: &RunContext) -> Result<()> {
    let path = context.data_path()?.to_path_buf();
    let options = context.load_options();
    let source_label = format_path_with_tilde(&path);
    let loader: Loader = Arc::new(move || load_conversations_with(&path, &options));

    let start_url = match &context.url {
        Some(url) => url.clone(),
        None => write_session_param(&context.settings.base_url, context.session.as_deref()),
    };

    run_interactive(loader, SessionSync::new(start_url), &context.settings.base_url, &source_label)
}

/// Aggregate counts over every loaded conversation
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub conversations: usize,
    pub sessions: usize,
    pub interactions: usize,
    pub agent_messages: usize,
    pub without_interactions: usize,
    pub grouping: GroupingStats,
}

impl CorpusStats {
    pub fn collect(conversations: &[Conversation]) -> Self {
        let mut stats = Self { conversations: conversations.len(), ..Self::default() };

        let mut sessions: Vec<&str> = conversations.iter().map(Conversation::session_label).collect();
        sessions.sort_unstable();
        sessions.dedup();
        stats.sessions = sessions.len();

        for conversation in conversations {
            let (interactions, grouping) = group_with_stats(&conversation.history);
            if interactions.is_empty() {
                stats.without_interactions += 1;
            }
            stats.interactions += interactions.len();
            stats.agent_messages += interactions.iter().map(|i| i.agent_messages.len()).sum::<usize>();
            stats.grouping.absorb(grouping);
        }

        stats
    }
}

fn show_stats(context: &RunContext) -> Result<()> {
    let conversations = context.load()?;
    let stats = CorpusStats::collect(&conversations);

    println!("Conversation Transcript Statistics");
    println!("==================================");
    println!("Conversations: {}", stats.conversations);
    println!("Sessions: {}", stats.sessions);
    println!("Interactions: {}", stats.interactions);
    println!("  Customer messages: {}", stats.interactions);
    println!("  Agent messages: {}", stats.agent_messages);
    println!("Conversations without interactions: {}", stats.without_interactions);
    println!(
        "Records skipped: {} (unrecognized: {}, agent before customer: {})",
        stats.grouping.dropped(),
        stats.grouping.dropped_unusable,
        stats.grouping.dropped_orphan_agent
    );
    println!();
    println!("Data source: {}", format_path_with_tilde(context.data_path()?));

    Ok(())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    id: &'a str,
    session_id: &'a str,
    interactions: &'a [Interaction],
    details: DetailsCard,
}

/// Pick the conversation to show: by session, by 1-based index, or the first
fn pick_conversation<'a>(
    conversations: &'a [Conversation],
    session: Option<&str>,
    index: Option<usize>,
) -> Result<&'a Conversation> {
    match (session, index) {
        (Some(_), Some(_)) => bail!("--session and --index cannot be combined"),
        (Some(session), None) => conversations
            .iter()
            .find(|conversation| conversation.session_label() == session)
            .with_context(|| format!("Session not found: {}", session)),
        (None, Some(index)) => index
            .checked_sub(1)
            .and_then(|i| conversations.get(i))
            .with_context(|| {
                format!("Index {} out of range (1-{})", index, conversations.len())
            }),
        (None, None) => conversations.first().context("No conversations found"),
    }
}

fn show_conversation(context: &RunContext, index: Option<usize>, json: bool) -> Result<()> {
    let conversations = context.load()?;
    if conversations.is_empty() && context.session.is_none() && index.is_none() {
        println!("No conversations found");
        return Ok(());
    }

    let conversation = pick_conversation(&conversations, context.session.as_deref(), index)?;
    let (interactions, _) = group_with_stats(&conversation.history);

    if json {
        let output = ShowOutput {
            id: &conversation.id,
            session_id: conversation.session_label(),
            interactions: &interactions,
            details: DetailsCard::new(conversation, interactions.len().min(1)),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", render_conversation_text(conversation, &interactions));
    Ok(())
}

/// Plain-text transcript of one conversation, ANSI-stripped
pub fn render_conversation_text(conversation: &Conversation, interactions: &[Interaction]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Session: {} | ID: {}\n",
        strip_ansi_codes(conversation.session_label()),
        strip_ansi_codes(&conversation.id)
    ));

    if interactions.is_empty() {
        out.push_str("No interactions found in this conversation\n");
        return out;
    }

    out.push_str(&format!("Interactions: {}\n", interactions.len()));
    for interaction in interactions {
        out.push_str(&format!(
            "\n=== Interaction {} of {} ===\n",
            interaction.interaction_number,
            interactions.len()
        ));
        out.push_str(&format!("Customer: {}\n", strip_ansi_codes(&interaction.customer_message)));
        for message in &interaction.agent_messages {
            out.push_str(&format!("Agent: {}\n", strip_ansi_codes(message)));
        }
        out.push_str(&format!(
            "Result: {} | Time: {}\n",
            interaction.result.as_deref().map_or_else(|| "N/A".to_string(), strip_ansi_codes),
            interaction.timestamp.map_or_else(|| "unknown".to_string(), |ts| ts.to_rfc3339())
        ));
    }

    out
}
