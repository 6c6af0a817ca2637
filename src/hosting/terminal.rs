use super::*;
use crate::actions::Inbound;
use crate::*;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::Sender;

/// Parses one input line: `<chat> <text>`, or `<chat> #<data>` for a button tap.
pub fn parse(line: &str) -> anyhow::Result<Job> {
    let (chat, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow::anyhow!("expected `<chat> <text>`, got {:?}", line))?;
    let chat = chat
        .parse::<ChatId>()
        .map_err(|e| anyhow::anyhow!("bad chat id {:?}: {}", chat, e))?;
    let rest = rest.trim();
    let inbound = match rest.strip_prefix('#') {
        Some(data) => Inbound::Callback(data.to_string()),
        None => Inbound::Message(rest.to_string()),
    };
    Ok((chat, inbound))
}

/// Feeds every line of `reader` into the worker queue until EOF.
/// Malformed lines are logged and skipped.
pub async fn pump<R>(reader: R, queue: Sender<Job>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse(&line) {
            Ok(job) => queue
                .send(job)
                .await
                .map_err(|_| anyhow::anyhow!("worker pool closed"))?,
            Err(e) => log::warn!("[terminal] {}", e),
        }
    }
    Ok(())
}
