use std::io;
use std::process::{Command, Stdio};

use dusky_core::dispatch::{SpawnRequest, Spawner};

/// Starts commands detached from the launcher.
///
/// Each child gets its own session and null stdio, so it survives the
/// launcher exiting and can't block on a closed pipe.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn(&self, request: &SpawnRequest) -> io::Result<()> {
        let argv = request.to_argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command"));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // New session (and process group), detached from our terminal
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let mut child = cmd.spawn()?;
        tracing::debug!(pid = child.id(), program = %program, "spawned");

        // Reap in the background so exited children don't linger as zombies.
        // The exit status is dropped.
        std::thread::Builder::new()
            .name("reap".into())
            .spawn(move || {
                let _ = child.wait();
            })?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_spawn_shell_request() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let request = SpawnRequest::Shell(format!("echo ok > '{}'", marker.display()));

        DetachedSpawner.spawn(&request).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !marker.exists() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let request = SpawnRequest::Argv(vec!["dusky-no-such-program-xyz".into()]);
        let err = DetachedSpawner.spawn(&request).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_empty_argv_rejected() {
        let err = DetachedSpawner.spawn(&SpawnRequest::Argv(vec![])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
