//! Runs the dependency check before any front end is loaded
//!
//! Missing libraries are installed in a visible terminal (sudo needs a
//! prompt), after which the caller restarts the process.

use std::ffi::CString;
use std::process::Command;

use dusky_core::bootstrap::{
    BootstrapError, BootstrapOutcome, ExitDescription, Probe, Requirements, install_command,
    missing_packages,
};
use dusky_core::config::APP_TITLE;
use dusky_core::terminal::{build_terminal_cmd, find_terminal};

/// Probes libraries with `dlopen`
pub struct DlopenProbe;

impl Probe for DlopenProbe {
    fn library(&self, soname: &str) -> bool {
        let Ok(name) = CString::new(soname) else {
            return false;
        };
        unsafe {
            let handle = libc::dlopen(name.as_ptr(), libc::RTLD_LAZY | libc::RTLD_LOCAL);
            if handle.is_null() {
                return false;
            }
            libc::dlclose(handle);
        }
        true
    }
}

/// Check `requirements` and install whatever is missing.
///
/// Returns `RestartRequested` after a successful install; the new libraries
/// can only be picked up by a fresh process image.
pub fn ensure_dependencies(requirements: &Requirements) -> Result<BootstrapOutcome, BootstrapError> {
    if requirements.is_empty() {
        return Ok(BootstrapOutcome::Ready);
    }

    let missing = missing_packages(requirements, &DlopenProbe);
    if missing.is_empty() {
        tracing::debug!("all dependencies present");
        return Ok(BootstrapOutcome::Ready);
    }

    println!("[{APP_TITLE}] Missing dependencies: {}", missing.join(", "));
    let install = install_command(&missing);

    let Some(terminal) = find_terminal() else {
        return Err(BootstrapError::NoTerminal {
            manual_command: install,
        });
    };

    println!("[{APP_TITLE}] Launching {terminal} for installation...");
    let argv = build_terminal_cmd(&terminal, &format!("{APP_TITLE} Installer"), &install, true);

    // stdio inherited on purpose: the user has to answer sudo
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .map_err(|source| BootstrapError::TerminalMissing {
            terminal: terminal.clone(),
            source,
        })?;

    if !status.success() {
        return Err(BootstrapError::InstallFailed {
            status: ExitDescription(status.code()),
        });
    }

    println!("[{APP_TITLE}] Restarting...");
    Ok(BootstrapOutcome::RestartRequested)
}

/// Replace the current process with a fresh copy of itself.
///
/// Only returns on failure.
pub fn restart_self() -> BootstrapError {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => return BootstrapError::Restart(e),
    };
    let args: Vec<_> = std::env::args_os().skip(1).collect();

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        BootstrapError::Restart(Command::new(exe).args(args).exec())
    }
    #[cfg(not(unix))]
    {
        match Command::new(exe).args(args).status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(e) => BootstrapError::Restart(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_required_is_ready() {
        let outcome = ensure_dependencies(&Requirements::none()).unwrap();
        assert_eq!(outcome, BootstrapOutcome::Ready);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_probe_finds_libc() {
        assert!(DlopenProbe.library("libc.so.6"));
        assert!(!DlopenProbe.library("libdusky-does-not-exist.so.0"));
        assert!(!DlopenProbe.library("bad\0name"));
    }
}
