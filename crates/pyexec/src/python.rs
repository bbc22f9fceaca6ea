use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

use crate::{channel, RunHandle, RunSender, ScriptRunner};

/// Runs listings by piping them into an interpreter's standard input.
///
/// With the default arguments this is `python3 -u -`: unbuffered, program read from stdin.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    interpreter: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl PythonRunner {
    pub fn new(interpreter: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args,
            working_dir: None,
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    fn spawn(&self) -> Result<Child> {
        let mut command = Command::new(&self.interpreter);
        command
            .args(&self.args)
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = self.working_dir.as_ref().filter(|dir| dir.is_dir()) {
            command.current_dir(dir);
        }

        command
            .spawn()
            .with_context(|| format!("Failed to start interpreter '{}'", self.interpreter))
    }
}

impl Default for PythonRunner {
    fn default() -> Self {
        Self::new("python3", vec!["-u".to_string(), "-".to_string()])
    }
}

impl ScriptRunner for PythonRunner {
    fn run(&self, source: &str) -> Result<RunHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("Script runner needs a tokio runtime")?;
        let child = self.spawn()?;
        log::info!(
            "Started '{}' with {} bytes of source",
            self.interpreter,
            source.len()
        );

        let (sender, handle) = channel();
        let mut source = source.to_string();
        source.push('\n');
        runtime.spawn(drive(child, source, sender));
        Ok(handle)
    }
}

async fn drive(mut child: Child, source: String, mut sender: RunSender) {
    if let Some(mut stdin) = child.stdin.take() {
        // Fed from its own task so a chatty script cannot deadlock against us.
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(source.as_bytes()).await {
                log::warn!("Failed to write source to interpreter: {}", e);
            }
        });
    }

    let mut stdout = child.stdout.take().map(BufReader::new);
    let mut stderr = child.stderr.take().map(BufReader::new);
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();
    let mut interrupted = false;

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            read = next_chunk(&mut stdout, &mut stdout_buf) => {
                forward(read, &mut stdout, &mut stdout_buf, &sender)
            }
            read = next_chunk(&mut stderr, &mut stderr_buf) => {
                forward(read, &mut stderr, &mut stderr_buf, &sender)
            }
            _ = sender.cancelled() => {
                interrupt(&mut child, &sender);
                interrupted = true;
                // Grandchildren may keep the pipes open; stop reading now.
                break;
            }
        }
    }

    // Both streams are closed but the script may still be running.
    if !interrupted {
        let cancel_requested = tokio::select! {
            _ = child.wait() => false,
            _ = sender.cancelled() => true,
        };
        if cancel_requested {
            interrupt(&mut child, &sender);
        }
    }

    let success = match child.wait().await {
        Ok(status) => {
            let report = match status.code() {
                Some(code) => format!("\nProcess finished with exit code {}\n", code),
                None => "\nProcess terminated\n".to_string(),
            };
            sender.output(report);
            log::info!("Interpreter exited: {}", status);
            status.success()
        }
        Err(e) => {
            log::error!("Failed to wait for interpreter: {}", e);
            sender.output(format!("\nError: {}\n", e));
            false
        }
    };
    sender.finish(success);
}

fn interrupt(child: &mut Child, sender: &RunSender) {
    log::info!("Run cancelled, killing interpreter");
    if let Err(e) = child.start_kill() {
        log::warn!("Failed to kill interpreter: {}", e);
    }
    sender.output("\nInterrupted\n");
}

/// Read up to and including the next newline, appending to `buf`.
///
/// Bytes from a read interrupted by another `select!` branch stay in `buf`
/// and are completed by the next call.
async fn next_chunk<R>(reader: &mut Option<BufReader<R>>, buf: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read_until(b'\n', buf).await,
        None => std::future::pending().await,
    }
}

/// Send a finished chunk as-is, decoding invalid UTF-8 lossily. The stream is
/// dropped only at end of file or on an I/O error.
fn forward<R>(
    read: io::Result<usize>,
    reader: &mut Option<BufReader<R>>,
    buf: &mut Vec<u8>,
    sender: &RunSender,
) {
    match read {
        Ok(0) => {
            flush(buf, sender);
            *reader = None;
        }
        Ok(_) => flush(buf, sender),
        Err(e) => {
            log::warn!("Failed to read interpreter output: {}", e);
            flush(buf, sender);
            *reader = None;
        }
    }
}

fn flush(buf: &mut Vec<u8>, sender: &RunSender) {
    if !buf.is_empty() {
        sender.output(String::from_utf8_lossy(buf).into_owned());
        buf.clear();
    }
}
