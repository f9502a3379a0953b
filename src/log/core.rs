use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use tokio::{io::AsyncWriteExt, task::JoinHandle};

use super::data::{LogLevel, LogMessage};
use super::message::Message;
use crate::{ArcFile, ArcPath, fs::Fs};

const LOG_PREFIX: &str = "social-feed_";
const LOG_TIMESTAMP: &str = "%Y-%m-%d-%H-%M-%S";
const SCOPE: &str = "log";

/// The core of the logging system that manages logging to both stderr and log files.
///
/// Every message is written to a timestamped log file and to `latest.log`.
/// Messages at or above the print level are also buffered and printed to
/// stderr when the logger is flushed.
///
/// # Examples
/// ```ignore
/// let (log, _) = LogCore::build(fs, LogLevel::Info, 7, log_dir).await?.spawn();
/// log.info("main", "Application started");
/// ```
#[derive(Debug)]
pub struct LogCore {
    /// Filesystem interface for file operations
    fs: Fs,
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Path to the current timestamped log file
    log_path: ArcPath,
    /// Handle to the current log file
    log_file: ArcFile,
    /// Handle to the "latest" log file
    latest_log_file: ArcFile,
    /// Buffer of messages to be printed to stderr
    logs_to_print: Vec<LogMessage>,
    /// Minimum level of messages to be printed to stderr
    print_level: LogLevel,
    /// Maximum age of log files in days before they are deleted, 0 keeps them forever
    max_age: usize,
}

impl LogCore {
    pub async fn build(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let log_path = ArcPath::from(log_dir.join(format!(
            "{}{}.log",
            LOG_PREFIX,
            Utc::now().format(LOG_TIMESTAMP)
        )));
        let latest_log_path = ArcPath::from(log_dir.join("latest.log"));

        fs.mkdir(log_dir.clone())
            .await
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_file = fs
            .open_file(log_path.clone())
            .await
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        let latest_log_file = fs
            .open_file(latest_log_path.clone())
            .await
            .with_context(|| {
                format!(
                    "Failed to create latest log file: {}",
                    latest_log_path.display()
                )
            })?;

        Ok(Self {
            fs,
            log_dir,
            log_path,
            log_file,
            latest_log_file,
            logs_to_print: Vec::new(),
            print_level: level,
            max_age,
        })
    }

    pub fn spawn(mut self) -> (super::Log, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Message::Log(msg) => {
                        self.log(msg).await;
                    }
                    Message::Flush => {
                        rx.close();
                        self.flush();
                        break;
                    }
                    Message::CollectGarbage => {
                        self.collect_garbage().await;
                    }
                }
            }
        });
        (super::Log::Actual(tx), handle)
    }

    async fn log(&mut self, message: LogMessage) {
        let line = format!("{}\n", &message);

        for file in [&self.log_file, &self.latest_log_file] {
            let mut lock = file.write().await;
            if let Err(err) = lock.write_all(line.as_bytes()).await {
                eprintln!("Failed to write to log file: {err}");
                continue;
            }
            if let Err(err) = lock.flush().await {
                eprintln!("Failed to flush log file: {err}");
            }
        }

        if message.level >= self.print_level {
            self.logs_to_print.push(message);
        }
    }

    fn flush(self) {
        for message in &self.logs_to_print {
            eprintln!("{}", message);
        }
        if !self.logs_to_print.is_empty() {
            eprintln!("Check the full log file: {}", self.log_path.display());
        }
    }

    /// Removes log files whose name-encoded timestamp is older than `max_age` days.
    async fn collect_garbage(&mut self) {
        if self.max_age == 0 {
            return;
        }
        let now = Utc::now().naive_utc();
        let Ok(logs) = self.fs.read_dir(self.log_dir.clone()).await else {
            self.log(LogMessage {
                level: LogLevel::Error,
                scope: SCOPE,
                message: "Failed to read the logs directory during garbage collection".into(),
            })
            .await;
            return;
        };
        for log in logs {
            let Some(created) = log
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_log_timestamp)
            else {
                continue;
            };
            let age = (now - created).num_days();
            if age > self.max_age as i64 && self.fs.remove_file(log.clone()).await.is_err() {
                self.log(LogMessage {
                    level: LogLevel::Warning,
                    scope: SCOPE,
                    message: format!("Failed to remove the log file: {}", log.display()),
                })
                .await;
            }
        }
    }
}

/// Extracts the creation time from a `social-feed_<timestamp>.log` file name.
fn parse_log_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let stamp = filename.strip_prefix(LOG_PREFIX)?.strip_suffix(".log")?;
    NaiveDateTime::parse_from_str(stamp, LOG_TIMESTAMP).ok()
}
