use crate::traits::DownloadCommandFactory;
use async_lock::Mutex;
use futures_lite::{future, StreamExt};
use serde::Serialize;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinSet;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const LINE_DELIMITERS: &[u8] = b"\r\n";
const MAX_LINE_LENGTH: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadJob {
    pub url: String,
    pub status: DownloadStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("unable to start download tool: {0}")]
    Spawn(io::Error),
    #[error("unable to capture {0} of download tool")]
    MissingPipe(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("download tool finished with {0}")]
    ExitStatus(ExitStatus),
    #[error("download timed out after {0:?}")]
    TimedOut(Duration),
    #[error("download tool wrote a line longer than {0} bytes")]
    LineTooLong(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadRequestError {
    #[error("No URLs provided")]
    EmptyInput,
}

/// Line oriented sink shared by all workers of one batch.
///
/// Each line is written and flushed under the lock, so lines of different
/// workers never interleave mid-line. Once a write fails (client went away)
/// all further lines are discarded.
pub struct OutputStream<W> {
    writer: Mutex<W>,
    broken: AtomicBool,
}

impl<W: AsyncWrite + Unpin> OutputStream<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            broken: AtomicBool::new(false),
        }
    }

    pub async fn write_line(&self, line: &str) {
        if self.broken.load(Ordering::Relaxed) {
            return;
        }

        let mut writer = self.writer.lock().await;
        let result = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        if let Err(error) = result {
            debug!(%error, "Output stream closed, discarding further lines");
            self.broken.store(true, Ordering::Relaxed);
        }
    }

    async fn close(&self) {
        if let Err(error) = self.writer.lock().await.shutdown().await {
            debug!(%error, "Unable to shut down output stream");
        }
    }
}

pub struct DownloadOrchestrator {
    commands: Arc<dyn DownloadCommandFactory + Send + Sync>,
    timeout: Option<Duration>,
}

impl DownloadOrchestrator {
    /// `timeout` limits the run time of every single subprocess; `None` lets
    /// them run until they exit.
    pub fn new(
        commands: Arc<dyn DownloadCommandFactory + Send + Sync>,
        timeout: Option<Duration>,
    ) -> Self {
        Self { commands, timeout }
    }

    pub fn validate(urls: &[String]) -> Result<(), DownloadRequestError> {
        if urls.is_empty() {
            return Err(DownloadRequestError::EmptyInput);
        }

        Ok(())
    }

    /// Runs one download tool per URL concurrently and writes their
    /// attributed output to `sink`. Returns after every worker finished and
    /// the sink was shut down.
    pub async fn stream_downloads<W>(&self, urls: Vec<String>, sink: W) -> Vec<DownloadJob>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let batch_id = Uuid::new_v4();
        let output = Arc::new(OutputStream::new(sink));
        let mut jobs = urls
            .into_iter()
            .map(|url| DownloadJob {
                url,
                status: DownloadStatus::Pending,
            })
            .collect::<Vec<_>>();

        info!(%batch_id, workers = jobs.len(), "Starting downloads");

        output
            .write_line(&format!("Number of workers: {}", jobs.len()))
            .await;

        let mut workers = JoinSet::new();

        for (index, job) in jobs.iter_mut().enumerate() {
            let commands = self.commands.clone();
            let output = output.clone();
            let url = job.url.clone();
            let timeout = self.timeout;

            job.status = DownloadStatus::Running;

            workers.spawn(async move {
                let status = run_job(commands.as_ref(), &url, timeout, &output).await;
                (index, status)
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, status)) => jobs[index].status = status,
                Err(error) => error!(%batch_id, ?error, "Download worker terminated abnormally"),
            }
        }

        for job in jobs.iter_mut() {
            if job.status == DownloadStatus::Running {
                job.status = DownloadStatus::Failed;
            }
        }

        output.write_line("All downloads completed").await;
        output.close().await;

        let succeeded = jobs
            .iter()
            .filter(|job| job.status == DownloadStatus::Succeeded)
            .count();

        info!(
            %batch_id,
            succeeded,
            failed = jobs.len() - succeeded,
            "Downloads finished"
        );

        jobs
    }
}

async fn run_job<W: AsyncWrite + Unpin>(
    commands: &(dyn DownloadCommandFactory + Send + Sync),
    url: &str,
    timeout: Option<Duration>,
    output: &OutputStream<W>,
) -> DownloadStatus {
    let mut command = commands.command(url);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, supervise(command, url, output))
            .await
            .unwrap_or(Err(DownloadError::TimedOut(limit))),
        None => supervise(command, url, output).await,
    };

    match result {
        Ok(()) => {
            info!(%url, "Download completed");
            output
                .write_line(&format!("Download completed successfully for URL {}", url))
                .await;
            DownloadStatus::Succeeded
        }
        Err(error) => {
            warn!(%url, %error, "Download failed");
            output
                .write_line(&format!("Download failed for URL {}: {}", url, error))
                .await;
            DownloadStatus::Failed
        }
    }
}

async fn supervise<W: AsyncWrite + Unpin>(
    mut command: Command,
    url: &str,
    output: &OutputStream<W>,
) -> Result<(), DownloadError> {
    let mut child = command.spawn().map_err(DownloadError::Spawn)?;

    debug!(%url, pid = child.id(), "Download tool started");

    let stdout = child
        .stdout
        .take()
        .ok_or(DownloadError::MissingPipe("stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(DownloadError::MissingPipe("stderr"))?;

    future::try_zip(
        forward_lines(stdout, url, output),
        forward_lines(stderr, url, output),
    )
    .await?;

    let status = child.wait().await?;

    if !status.success() {
        return Err(DownloadError::ExitStatus(status));
    }

    Ok(())
}

/// Copies every non-blank line of `reader` to the output, prefixed with the
/// URL. Carriage returns count as line breaks. Lines are capped at
/// `MAX_LINE_LENGTH` bytes.
async fn forward_lines<R, W>(
    reader: R,
    url: &str,
    output: &OutputStream<W>,
) -> Result<(), DownloadError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let codec = AnyDelimiterCodec::new_with_max_length(
        LINE_DELIMITERS.to_vec(),
        Vec::new(),
        MAX_LINE_LENGTH,
    );
    let mut lines = FramedRead::new(reader, codec);

    while let Some(line) = lines.next().await {
        let line = line.map_err(|error| match error {
            AnyDelimiterCodecError::MaxChunkLengthExceeded => {
                DownloadError::LineTooLong(MAX_LINE_LENGTH)
            }
            AnyDelimiterCodecError::Io(error) => DownloadError::Io(error),
        })?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim_end();

        if line.trim().is_empty() {
            continue;
        }

        output.write_line(&format!("[{}] {}", url, line)).await;
    }

    Ok(())
}
