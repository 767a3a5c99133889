#![deny(clippy::all, clippy::pedantic)]

use std::io::Write;

use cbot_api_types::JobList;

use crate::client::{CliError, Ctx, Operation};
use crate::print::{self, OutputFormat};

pub async fn list<W: Write>(
    ctx: &Ctx,
    bot_id: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let reply = ctx.call(Operation::ListJobs { bot_id }, None).await?;
    match format {
        OutputFormat::Json => print::raw(out, &reply),
        OutputFormat::Text => {
            let list: JobList = reply.parse()?;
            print::text(out, &print::jobs_table(&list.jobs))
        }
    }
}

pub async fn abort<W: Write>(ctx: &Ctx, job_id: &str, out: &mut W) -> Result<(), CliError> {
    let reply = ctx.call(Operation::AbortJob { job_id }, None).await?;
    print::raw(out, &reply)
}
