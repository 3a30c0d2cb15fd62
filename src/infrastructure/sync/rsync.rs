//! Rsync Mirror
//!
//! `rsync -azm --progress` over ssh. Progress output is streamed to the
//! trace log and transferred files are counted from it.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::config::ResolvedHost;
use crate::domain::ports::{Mirror, MirrorReport, MirrorRequest};
use crate::error::{SdkError, SdkResult};

/// Remote rsync invocation used when the host does not configure one
pub const DEFAULT_RSYNC_PATH: &str = "sudo -u lithium rsync";

#[derive(Debug, Clone)]
pub struct RsyncMirror {
    program: PathBuf,
    rsync_path: String,
    identity_file: Option<PathBuf>,
}

impl RsyncMirror {
    pub fn new(rsync_path: Option<String>, identity_file: Option<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("rsync"),
            rsync_path: rsync_path.unwrap_or_else(|| DEFAULT_RSYNC_PATH.to_string()),
            identity_file,
        }
    }

    /// Run `program` instead of the `rsync` found on `PATH`
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn for_host(host: &ResolvedHost) -> Self {
        Self::new(host.rsync_path.clone(), host.ssh_identity_file.clone())
    }

    /// Full argument list, without the program name
    pub fn args(&self, request: &MirrorRequest) -> Vec<String> {
        let ssh = match &self.identity_file {
            Some(identity) => format!("ssh -i {}", identity.display()),
            None => "ssh".to_string(),
        };

        let mut args = vec![
            "-azm".to_string(),
            "--progress".to_string(),
            format!("--rsync-path={}", self.rsync_path),
            "-e".to_string(),
            ssh,
        ];
        args.extend(request.include.iter().map(|p| format!("--include={}", p)));
        args.extend(request.exclude.iter().map(|p| format!("--exclude={}", p)));
        args.push(request.source.clone());
        args.push(request.destination.clone());
        args
    }
}

impl Mirror for RsyncMirror {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn mirror(&self, request: &MirrorRequest) -> SdkResult<MirrorReport> {
        let transport_error = |message: String| SdkError::Transport {
            source_path: request.source.clone(),
            destination: request.destination.clone(),
            message,
        };

        let args = self.args(request);
        tracing::debug!(command = %format!("rsync {}", args.join(" ")), "rsync command");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| transport_error(e.to_string()))?;

        // stderr is drained concurrently so a chatty rsync cannot fill the
        // pipe and stall while stdout is still being read
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                buf
            })
        });

        let mut transferred = 0;
        let mut read_error = None;
        if let Some(stdout) = child.stdout.take() {
            for chunk in BufReader::new(stdout).split(b'\n') {
                match chunk {
                    Ok(bytes) => transferred += count_transferred(&String::from_utf8_lossy(&bytes)),
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
        }

        let status = child.wait().map_err(|e| transport_error(e.to_string()))?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(transport_error(if stderr.is_empty() {
                format!("rsync exited with {}", status)
            } else {
                stderr
            }));
        }
        if let Some(e) = read_error {
            tracing::debug!(error = %e, "rsync progress output cut short");
        }

        Ok(MirrorReport { transferred })
    }
}

/// Count file entries in one line of `--progress` output.
///
/// A file entry has a directory component and a final name containing a dot;
/// percentage updates and summary lines do not.
fn count_transferred(line: &str) -> usize {
    line.split('\r')
        .map(str::trim)
        .filter(|part| {
            let Some((_, last)) = part.rsplit_once('/') else {
                return false;
            };
            let file = last.split(' ').next().unwrap_or_default();
            let counted = !file.is_empty() && file.contains('.');
            if counted {
                tracing::trace!("syncing: {}", part);
            }
            counted
        })
        .count()
}
