#![deny(clippy::all, clippy::pedantic)]

use std::fmt::Write as _;
use std::io::Write;

use cbot_api_types::{BotSummary, JobSummary};

use crate::client::{CliError, Reply};

const BOTS_HEADER: &str = "id\tname\tdescription\tcreated\tlast_modified\tcreator";
const JOBS_HEADER: &str = "job_id\tbot_id\tbot_name\tstatus\tstart_time\telapsed_time";

/// Listing output selected with `-f`. Anything other than `text` means JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn from_flag(value: &str) -> Self {
        if value == "text" { Self::Text } else { Self::Json }
    }
}

/// Print the response body exactly as received.
pub fn raw<W: Write>(out: &mut W, reply: &Reply) -> Result<(), CliError> {
    writeln!(out, "{}", reply.body)?;
    Ok(())
}

pub fn text<W: Write>(out: &mut W, rendered: &str) -> Result<(), CliError> {
    out.write_all(rendered.as_bytes())?;
    Ok(())
}

fn cell(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

pub fn bots_table(bots: &[BotSummary]) -> String {
    let mut table = format!("{BOTS_HEADER}\n");
    for bot in bots {
        let _ = writeln!(
            table,
            "{}\t{}\t{}\t{}\t{}\t{}",
            cell(bot.id.as_deref()),
            cell(bot.name.as_deref()),
            cell(bot.description.as_deref()),
            cell(bot.created.as_deref()),
            cell(bot.last_modified.as_deref()),
            cell(bot.creator.as_deref()),
        );
    }
    table
}

pub fn jobs_table(jobs: &[JobSummary]) -> String {
    let mut table = format!("{JOBS_HEADER}\n");
    for job in jobs {
        let _ = writeln!(
            table,
            "{}\t{}\t{}\t{}\t{}\t{}",
            cell(job.job_id.as_deref()),
            cell(job.bot_id.as_deref()),
            cell(job.bot_name.as_deref()),
            job.status_label(),
            cell(job.start_time.as_deref()),
            job.elapsed_time.unwrap_or_default(),
        );
    }
    table
}
