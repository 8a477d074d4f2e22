//! Console chat loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::core::{ChatSession, LlmError};

pub const EXIT_COMMAND: &str = "exit";
pub const INPUT_PROMPT: &str = "Enter your message (or \"exit\" to quit): ";

/// Counts of what happened during one REPL run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplSummary {
    /// Turns that produced a reply
    pub turns: usize,
    /// Turns that failed and were reported
    pub errors: usize,
}

/// `exit` in any letter case, with nothing around it.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Read lines from `input` and send each to `session` until the user types
/// `exit` or the input ends.
///
/// Replies go to `output`. A failed turn is written to `errors` as
/// `Error: <message>` and the loop carries on. Input that is not valid UTF-8
/// is decoded lossily. Only a failure of the console streams themselves ends
/// the loop early.
pub async fn run<S, R, W, E>(
    session: &mut S,
    mut input: R,
    output: &mut W,
    errors: &mut E,
) -> Result<ReplSummary, LlmError>
where
    S: ChatSession + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let mut summary = ReplSummary::default();
    let mut buf = Vec::new();

    loop {
        write_flush(output, INPUT_PROMPT).await?;

        let Some(line) = read_line(&mut input, &mut buf).await? else {
            debug!("Input closed");
            break;
        };

        if is_exit_command(&line) {
            break;
        }

        match session.send_message(&line).await {
            Ok(reply) => {
                summary.turns += 1;
                write_flush(output, &format!("\nResponse: {reply}\n\n")).await?;
            }
            Err(err) => {
                summary.errors += 1;
                warn!(error = %err, "Chat turn failed");
                write_flush(errors, &format!("Error: {err}\n")).await?;
            }
        }
    }

    Ok(summary)
}

/// Next line without its terminator, or `None` at end of input.
async fn read_line<R>(input: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>, LlmError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if input
        .read_until(b'\n', buf)
        .await
        .map_err(LlmError::Console)?
        == 0
    {
        return Ok(None);
    }

    let line: &[u8] = buf;
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Ok(Some(String::from_utf8_lossy(line).into_owned()))
}

async fn write_flush<W>(writer: &mut W, text: &str) -> Result<(), LlmError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(LlmError::Console)?;
    writer.flush().await.map_err(LlmError::Console)
}
