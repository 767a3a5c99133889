//! Command-line surface for `cbot-cli`.
//! One primary action per invocation, resolved in a fixed priority order.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use cbot_api_types::ExecutionRequest;
use clap::{CommandFactory, Parser, builder::BoolishValueParser};

use crate::client::CliError;
use crate::io::parse_input;
use crate::print::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cbot-cli",
    version,
    about = "Cloud bot execution API CLI",
    override_usage = "cbot-cli [OPTION]... [BOT_ID]",
    long_about = None
)]
pub struct Cli {
    /// Directory holding cbot.json (default: $HOME/.cbot, %APPDATA%\cbot on Windows)
    #[arg(long, env = "CBOT_CONFIG_DIR", value_name = "PATH")]
    pub config_dir: Option<PathBuf>,

    /// Log level written to stderr (trace|debug|info|warn|error)
    #[arg(long, env = "CBOT_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(
        long,
        env = "CBOT_LOG_JSON",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Display current config profile
    #[arg(short = 'p', long = "profile")]
    pub display_profile: bool,

    /// Reconfigure the profile
    #[arg(short = 'r', long = "reconfigure")]
    pub reconfigure: bool,

    /// List your bots
    #[arg(short = 'l', long = "list")]
    pub list_bots: bool,

    /// Show bot detail
    #[arg(short = 's', long = "show", value_name = "BOT_ID")]
    pub show_bot: Option<String>,

    /// List jobs of a bot
    #[arg(short = 'j', long = "jobs", value_name = "BOT_ID")]
    pub list_jobs: Option<String>,

    /// Abort a job
    #[arg(short = 'a', long = "abort", value_name = "JOB_ID")]
    pub abort_job: Option<String>,

    /// Output format for listings: json | text
    #[arg(short = 'f', long = "format", default_value = "json", value_name = "FORMAT")]
    pub format: String,

    /// Input parameters for bot execution (ex: key:value,key2:value2)
    #[arg(short = 'i', long = "input", default_value = "", value_name = "PARAMS")]
    pub input: String,

    /// Timeout for bot execution (0-25000)
    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=25_000)
    )]
    pub timeout: u32,

    /// Callback endpoint URL (needs prefix https://)
    #[arg(short = 'u', long = "callback-url", default_value = "", value_name = "URL")]
    pub callback_url: String,

    /// Number of callback retry trials (0-5)
    #[arg(
        short = 'T',
        long = "callback-tries",
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=5)
    )]
    pub callback_tries: u32,

    /// Bot to execute
    #[arg(value_name = "BOT_ID")]
    pub bot_id: Option<String>,
}

/// What a single invocation does.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    ShowProfile,
    Reconfigure,
    Api(ApiAction),
}

/// Actions that reach the remote API.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiAction {
    ListBots { format: OutputFormat },
    ShowBot { bot_id: String },
    ListJobs { bot_id: String, format: OutputFormat },
    AbortJob { job_id: String },
    ExecuteBot { bot_id: String, request: ExecutionRequest },
}

fn given(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl Cli {
    /// Resolve the primary action:
    /// profile > reconfigure > list bots > show bot > list jobs > abort job > execute.
    pub fn action(&self) -> Result<Action, CliError> {
        if self.display_profile {
            return Ok(Action::ShowProfile);
        }
        if self.reconfigure {
            return Ok(Action::Reconfigure);
        }

        let format = OutputFormat::from_flag(&self.format);
        if self.list_bots {
            return Ok(Action::Api(ApiAction::ListBots { format }));
        }
        if let Some(bot_id) = given(self.show_bot.as_ref()) {
            return Ok(Action::Api(ApiAction::ShowBot { bot_id }));
        }
        if let Some(bot_id) = given(self.list_jobs.as_ref()) {
            return Ok(Action::Api(ApiAction::ListJobs { bot_id, format }));
        }
        if let Some(job_id) = given(self.abort_job.as_ref()) {
            return Ok(Action::Api(ApiAction::AbortJob { job_id }));
        }

        let Some(bot_id) = self.bot_id.clone() else {
            return Err(CliError::Usage(Self::command().render_help().to_string()));
        };

        let request = ExecutionRequest {
            timeout_time: self.timeout,
            callback_endpoint: self.callback_url.clone(),
            callback_tries: self.callback_tries,
            input: parse_input(&self.input)?,
        };
        Ok(Action::Api(ApiAction::ExecuteBot { bot_id, request }))
    }
}
