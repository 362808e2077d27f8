use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

// ─── ERRORS ─────────────────────────────────────────────────────

/// Why an external command produced no usable output.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The binary is not installed or not on PATH.
    NotFound(String),
    /// Spawning or waiting failed at the OS level.
    Io(String),
    /// The command ran but exited unsuccessfully.
    Failed {
        status: Option<i32>,
        output: String,
    },
    /// The command was killed after the given number of seconds.
    TimedOut(u64),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotFound(program) => write!(f, "{program}: command not found"),
            CommandError::Io(e) => write!(f, "failed to run command: {e}"),
            CommandError::Failed {
                status: Some(code), ..
            } => write!(f, "command exited with status {code}"),
            CommandError::Failed { status: None, .. } => {
                write!(f, "command terminated by signal")
            }
            CommandError::TimedOut(secs) => {
                write!(f, "command did not finish within {secs}s")
            }
        }
    }
}

fn spawn_error(program: &str, e: &std::io::Error) -> CommandError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CommandError::NotFound(program.to_string())
    } else {
        CommandError::Io(e.to_string())
    }
}

// ─── QUICK CAPTURE ──────────────────────────────────────────────

/// Runs a command to completion and returns its stdout. Short-lived
/// queries only (listings, lookups); anything slow goes through
/// `CommandRunner` or `capture_timeout`.
pub fn run_cmd(program: &str, args: &[&str]) -> Result<String, CommandError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(program, &e))?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(CommandError::Failed {
            status: output.status.code(),
            output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Runs a command with a hard deadline, returning combined stdout+stderr.
/// The child is killed when the deadline passes.
pub fn capture_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<String, CommandError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, &e))?;

    // Readers run off-thread so a full pipe can't stall the child.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_handle = thread::spawn(move || read_lossy(stdout));
    let err_handle = thread::spawn(move || read_lossy(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::TimedOut(timeout.as_secs()));
                }
                thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CommandError::Io(e.to_string()));
            }
        }
    };

    let mut combined = out_handle.join().unwrap_or_default();
    let err_text = err_handle.join().unwrap_or_default();
    if !err_text.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&err_text);
    }

    if status.success() {
        Ok(combined)
    } else {
        Err(CommandError::Failed {
            status: status.code(),
            output: combined,
        })
    }
}

fn read_lossy<R: Read>(src: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut r) = src {
        let _ = r.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).to_string()
}

// ─── STREAMING RUNNER ───────────────────────────────────────────

/// One event from a running administrative command.
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    /// A line of merged stdout/stderr output.
    Line(String),
    /// The command exited; the code is None when killed by a signal.
    Finished(Option<i32>),
    /// The command could not be started or waited on.
    Failed(String),
}

/// Runs one administrative command on a dedicated worker thread and
/// streams its output back over a channel. The UI drains the channel on
/// a short poll timer; `Finished`/`Failed` is always the last event.
pub struct CommandRunner {
    command_line: String,
    rx: Receiver<RunnerEvent>,
}

impl CommandRunner {
    pub fn spawn(program: &str, args: &[String]) -> Self {
        let mut command_line = String::from(program);
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }

        let (tx, rx) = mpsc::channel();

        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        match spawned {
            Ok(mut child) => {
                thread::spawn(move || {
                    // stderr on its own thread; both feed the same channel
                    let err_reader = child.stderr.take().map(|err| {
                        let tx = tx.clone();
                        thread::spawn(move || {
                            for line in BufReader::new(err).lines().map_while(Result::ok) {
                                if tx.send(RunnerEvent::Line(line)).is_err() {
                                    break;
                                }
                            }
                        })
                    });

                    if let Some(out) = child.stdout.take() {
                        for line in BufReader::new(out).lines().map_while(Result::ok) {
                            if tx.send(RunnerEvent::Line(line)).is_err() {
                                break;
                            }
                        }
                    }

                    if let Some(handle) = err_reader {
                        let _ = handle.join();
                    }

                    let event = match child.wait() {
                        Ok(status) => RunnerEvent::Finished(status.code()),
                        Err(e) => RunnerEvent::Failed(format!("failed to wait on command: {e}")),
                    };
                    let _ = tx.send(event);
                });
            }
            Err(e) => {
                let _ = tx.send(RunnerEvent::Failed(spawn_error(program, &e).to_string()));
            }
        }

        Self { command_line, rx }
    }

    /// The full command line, for the console header.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Drains every event the worker has produced so far.
    pub fn poll(&self) -> Vec<RunnerEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_cmd_captures_stdout() {
        let out = run_cmd("sh", &["-c", "printf 'a\\nb\\n'"]).unwrap();
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_run_cmd_missing_binary() {
        let err = run_cmd("warden-no-such-binary", &[]).unwrap_err();
        assert_eq!(
            err,
            CommandError::NotFound("warden-no-such-binary".into())
        );
        assert!(err.to_string().contains("command not found"));
    }

    #[test]
    fn test_run_cmd_reports_exit_status_and_stderr() {
        let err = run_cmd("sh", &["-c", "echo oops >&2; exit 3"]).unwrap_err();
        match err {
            CommandError::Failed { status, output } => {
                assert_eq!(status, Some(3));
                assert_eq!(output, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_capture_timeout_returns_combined_output() {
        let out = capture_timeout(
            "sh",
            &["-c".into(), "echo out; echo err >&2".into()],
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
    }

    #[test]
    fn test_capture_timeout_kills_slow_command() {
        let err = capture_timeout(
            "sh",
            &["-c".into(), "sleep 30".into()],
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert_eq!(err, CommandError::TimedOut(0));
    }

    #[test]
    fn test_runner_streams_lines_and_finishes_last() {
        let runner = CommandRunner::spawn("sh", &["-c".into(), "echo one; echo two >&2".into()]);
        assert_eq!(runner.command_line(), "sh -c echo one; echo two >&2");

        let mut lines = Vec::new();
        let mut code = None;
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline && code.is_none() {
            for event in runner.poll() {
                match event {
                    RunnerEvent::Line(line) => {
                        assert!(code.is_none(), "line arrived after exit event");
                        lines.push(line);
                    }
                    RunnerEvent::Finished(c) => code = Some(c),
                    RunnerEvent::Failed(e) => panic!("unexpected failure: {e}"),
                }
            }
            thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(code, Some(Some(0)));
        assert!(lines.contains(&"one".to_string()));
        assert!(lines.contains(&"two".to_string()));
    }

    #[test]
    fn test_runner_reports_spawn_failure() {
        let runner = CommandRunner::spawn("warden-no-such-binary", &[]);
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let events = runner.poll();
            if let Some(RunnerEvent::Failed(msg)) = events.first() {
                assert!(msg.contains("command not found"));
                break;
            }
            assert!(Instant::now() < deadline, "no failure event arrived");
            thread::sleep(Duration::from_millis(10));
        }
    }
}
