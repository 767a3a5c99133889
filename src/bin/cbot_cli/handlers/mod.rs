#![deny(clippy::all, clippy::pedantic)]

pub mod bots;
pub mod jobs;
pub mod profile;

use std::io::Write;

use crate::args::ApiAction;
use crate::client::{CliError, Ctx};

pub async fn handle<W: Write>(ctx: &Ctx, action: ApiAction, out: &mut W) -> Result<(), CliError> {
    match action {
        ApiAction::ListBots { format } => bots::list(ctx, format, out).await,
        ApiAction::ShowBot { bot_id } => bots::show(ctx, &bot_id, out).await,
        ApiAction::ExecuteBot { bot_id, request } => bots::execute(ctx, &bot_id, &request, out).await,
        ApiAction::ListJobs { bot_id, format } => jobs::list(ctx, &bot_id, format, out).await,
        ApiAction::AbortJob { job_id } => jobs::abort(ctx, &job_id, out).await,
    }
}
