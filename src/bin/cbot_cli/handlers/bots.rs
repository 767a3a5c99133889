#![deny(clippy::all, clippy::pedantic)]

use std::io::Write;

use cbot_api_types::{BotList, ExecutionRequest};

use crate::client::{CliError, Ctx, Operation};
use crate::io::to_value;
use crate::print::{self, OutputFormat};

pub async fn list<W: Write>(ctx: &Ctx, format: OutputFormat, out: &mut W) -> Result<(), CliError> {
    let reply = ctx.call(Operation::ListBots, None).await?;
    match format {
        OutputFormat::Json => print::raw(out, &reply),
        OutputFormat::Text => {
            let list: BotList = reply.parse()?;
            print::text(out, &print::bots_table(&list.bots))
        }
    }
}

pub async fn show<W: Write>(ctx: &Ctx, bot_id: &str, out: &mut W) -> Result<(), CliError> {
    let reply = ctx.call(Operation::ShowBot { bot_id }, None).await?;
    print::raw(out, &reply)
}

pub async fn execute<W: Write>(
    ctx: &Ctx,
    bot_id: &str,
    request: &ExecutionRequest,
    out: &mut W,
) -> Result<(), CliError> {
    let body = to_value(request)?;
    let reply = ctx.call(Operation::ExecuteBot { bot_id }, Some(&body)).await?;
    print::raw(out, &reply)
}
