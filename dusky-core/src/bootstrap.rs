//! Dependency bootstrap planning
//!
//! Works out which system packages are missing for a front end and what to
//! run to install them. Executing the install and restarting the process is
//! left to the binary.

use std::fmt;

/// A shared library and the package that ships it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub package: &'static str,
    pub soname: &'static str,
}

/// Libraries a front end needs before it can start.
///
/// `toolkit` is only probed once every `loader` library is present, since it
/// cannot load without them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirements {
    pub loader: Vec<Dependency>,
    pub toolkit: Vec<Dependency>,
}

impl Requirements {
    /// Nothing to check
    pub fn none() -> Self {
        Self::default()
    }

    /// GTK 4 + libadwaita on top of GObject
    pub fn gtk() -> Self {
        Self {
            loader: vec![Dependency {
                package: "glib2",
                soname: "libgobject-2.0.so.0",
            }],
            toolkit: vec![
                Dependency {
                    package: "gtk4",
                    soname: "libgtk-4.so.1",
                },
                Dependency {
                    package: "libadwaita",
                    soname: "libadwaita-1.so.0",
                },
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.loader.is_empty() && self.toolkit.is_empty()
    }
}

/// Checks whether a library can be loaded
pub trait Probe {
    fn library(&self, soname: &str) -> bool;
}

/// Packages to install, in check order, without duplicates.
///
/// If any toolkit library fails to load, every toolkit package is reported:
/// a partial install usually means a version mismatch across all of them.
pub fn missing_packages(requirements: &Requirements, probe: &impl Probe) -> Vec<String> {
    fn push(missing: &mut Vec<String>, package: &str) {
        if !missing.iter().any(|p| p == package) {
            missing.push(package.to_string());
        }
    }

    let mut missing: Vec<String> = Vec::new();

    for dep in &requirements.loader {
        if !probe.library(dep.soname) {
            push(&mut missing, dep.package);
        }
    }

    if missing.is_empty() && !requirements.toolkit.iter().all(|dep| probe.library(dep.soname)) {
        for dep in &requirements.toolkit {
            push(&mut missing, dep.package);
        }
    }

    missing
}

/// Interactive install command for the given packages
pub fn install_command(packages: &[String]) -> String {
    format!("sudo pacman -S --needed {}", packages.join(" "))
}

/// What the entry point should do after the dependency check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Everything present, continue starting up
    Ready,
    /// Packages were installed; re-exec so they can be loaded
    RestartRequested,
}

/// Unrecoverable bootstrap failures. The process exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("no terminal found, install manually:\n{manual_command}")]
    NoTerminal { manual_command: String },

    #[error("installation failed ({status})")]
    InstallFailed { status: ExitDescription },

    #[error("could not start terminal {terminal}: {source}")]
    TerminalMissing {
        terminal: String,
        #[source]
        source: std::io::Error,
    },

    #[error("restart failed: {0}")]
    Restart(#[source] std::io::Error),
}

/// Exit status of the installer, printable without platform types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitDescription(pub Option<i32>);

impl fmt::Display for ExitDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    struct FakeProbe {
        present: BTreeSet<&'static str>,
    }

    impl FakeProbe {
        fn with(libs: &[&'static str]) -> Self {
            Self {
                present: libs.iter().copied().collect(),
            }
        }
    }

    impl Probe for FakeProbe {
        fn library(&self, soname: &str) -> bool {
            self.present.contains(soname)
        }
    }

    #[test]
    fn test_all_present() {
        let probe = FakeProbe::with(&["libgobject-2.0.so.0", "libgtk-4.so.1", "libadwaita-1.so.0"]);
        assert!(missing_packages(&Requirements::gtk(), &probe).is_empty());
    }

    #[test]
    fn test_missing_loader_skips_toolkit_probe() {
        let probe = FakeProbe::with(&[]);
        assert_eq!(missing_packages(&Requirements::gtk(), &probe), ["glib2"]);
    }

    #[test]
    fn test_one_toolkit_lib_missing_reports_all() {
        let probe = FakeProbe::with(&["libgobject-2.0.so.0", "libgtk-4.so.1"]);
        assert_eq!(
            missing_packages(&Requirements::gtk(), &probe),
            ["gtk4", "libadwaita"]
        );
    }

    #[test]
    fn test_no_requirements() {
        let probe = FakeProbe::with(&[]);
        assert!(Requirements::none().is_empty());
        assert!(missing_packages(&Requirements::none(), &probe).is_empty());
    }

    #[test]
    fn test_duplicates_collapsed() {
        let dep = Dependency {
            package: "glib2",
            soname: "libglib-2.0.so.0",
        };
        let reqs = Requirements {
            loader: vec![dep, dep],
            toolkit: vec![],
        };
        assert_eq!(missing_packages(&reqs, &FakeProbe::with(&[])), ["glib2"]);
    }

    #[test]
    fn test_install_command() {
        let pkgs = vec!["gtk4".to_string(), "libadwaita".to_string()];
        assert_eq!(install_command(&pkgs), "sudo pacman -S --needed gtk4 libadwaita");
    }

    #[test]
    fn test_error_messages() {
        let err = BootstrapError::NoTerminal {
            manual_command: install_command(&["gtk4".into()]),
        };
        assert!(err.to_string().contains("sudo pacman -S --needed gtk4"));

        let err = BootstrapError::InstallFailed {
            status: ExitDescription(Some(1)),
        };
        assert_eq!(err.to_string(), "installation failed (exit code 1)");
    }
}
