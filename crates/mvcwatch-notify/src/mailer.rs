//! Mail dispatch through the local sendmail binary.
//!
//! Fire-and-forget: callers log a failure and move on; the cycle still
//! counts as an attempted alert for dedup purposes.

use thiserror::Error;
use tokio::io::AsyncWriteExt;

const SENDMAIL_PATH: &str = "/usr/sbin/sendmail";
const FROM_ADDR: &str = "mvcwatch-bot@localhost";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("sendmail I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sendmail exited with {status}")]
    Exit { status: std::process::ExitStatus },
}

/// Pipe an RFC 822-style message to `sendmail -t -oi`.
///
/// Recipient handling for an empty list happens at the call site (the body
/// is printed instead); this function assumes at least one recipient.
///
/// # Errors
///
/// Returns [`NotifyError::Io`] when sendmail cannot be spawned or written
/// to, and [`NotifyError::Exit`] when it exits non-zero.
pub async fn send(subject: &str, body: &str, recipients: &[String]) -> Result<(), NotifyError> {
    let message = format!(
        "From: {FROM_ADDR}\nTo: {}\nSubject: {subject}\n\n{body}\n",
        recipients.join(",")
    );

    let mut child = tokio::process::Command::new(SENDMAIL_PATH)
        .arg("-t")
        .arg("-oi")
        .stdin(std::process::Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(message.as_bytes()).await?;
        // Drop closes the pipe so sendmail sees EOF.
    }

    let status = child.wait().await?;
    if !status.success() {
        return Err(NotifyError::Exit { status });
    }
    tracing::debug!(recipients = recipients.len(), subject, "notification sent");
    Ok(())
}
