//! Command dispatch
//!
//! Turns an activated [`Item`] into a [`SpawnRequest`] and hands it to a
//! [`Spawner`]. Planning is pure so the decision table can be tested without
//! starting processes; the spawner is the only side effect.

use std::fmt;
use std::io;

use crate::config::Item;
use crate::terminal::build_terminal_cmd;

/// Session launcher that ties GUI programs to the compositor session
pub const SESSION_LAUNCHER: &str = "uwsm-app";

/// How a command should be started
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnRequest {
    /// Exec the argument vector directly, no shell in between
    Argv(Vec<String>),
    /// Run the string through `sh -c`
    Shell(String),
}

impl SpawnRequest {
    /// The argument vector that will actually be executed
    pub fn to_argv(&self) -> Vec<String> {
        match self {
            SpawnRequest::Argv(args) => args.clone(),
            SpawnRequest::Shell(cmd) => vec!["sh".into(), "-c".into(), cmd.clone()],
        }
    }
}

impl fmt::Display for SpawnRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnRequest::Argv(args) => write!(f, "{}", args.join(" ")),
            SpawnRequest::Shell(cmd) => write!(f, "sh -c {cmd}"),
        }
    }
}

/// Starts processes. The launcher never waits on what it spawns.
pub trait Spawner {
    fn spawn(&self, request: &SpawnRequest) -> io::Result<()>;
}

impl<S: Spawner + ?Sized> Spawner for &S {
    fn spawn(&self, request: &SpawnRequest) -> io::Result<()> {
        (**self).spawn(request)
    }
}

/// Result of activating an item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Blank command, nothing started
    Skipped,
    Spawned(SpawnRequest),
    Failed(String),
}

/// Decides how to run items and starts them
pub struct Dispatcher<S> {
    spawner: S,
    terminal: Option<String>,
    title: String,
}

impl<S: Spawner> Dispatcher<S> {
    /// `terminal` is resolved once by the caller and reused for every activation.
    pub fn new(spawner: S, terminal: Option<String>, title: impl Into<String>) -> Self {
        Self {
            spawner,
            terminal,
            title: title.into(),
        }
    }

    pub fn terminal(&self) -> Option<&str> {
        self.terminal.as_deref()
    }

    /// Plan an item using the process environment
    pub fn plan(&self, item: &Item) -> Option<SpawnRequest> {
        self.plan_with_env(item, |name| std::env::var(name).ok())
    }

    /// Plan an item, resolving `$VAR` references through `env`.
    pub fn plan_with_env<F>(&self, item: &Item, env: F) -> Option<SpawnRequest>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if item.command.trim().is_empty() {
            return None;
        }

        let expanded = expand_env(&item.command, env);

        // Already wrapped by the user, don't wrap twice
        let use_uwsm = if expanded.contains(SESSION_LAUNCHER) {
            false
        } else {
            item.use_uwsm
        };

        if item.terminal {
            if let Some(terminal) = &self.terminal {
                // Terminals are GUI apps themselves, always wrapped
                let mut argv = vec![SESSION_LAUNCHER.to_string(), "--".to_string()];
                argv.extend(build_terminal_cmd(terminal, &self.title, &expanded, true));
                return Some(SpawnRequest::Argv(argv));
            }
            tracing::warn!("no terminal found, running in background");
            return Some(wrapped(expanded));
        }

        if use_uwsm {
            Some(wrapped(expanded))
        } else {
            Some(SpawnRequest::Shell(expanded))
        }
    }

    /// Run an item. Spawn failures are logged and reported, never raised.
    pub fn dispatch(&self, item: &Item) -> DispatchOutcome {
        let Some(request) = self.plan(item) else {
            tracing::debug!(title = %item.title, "blank command, nothing to run");
            return DispatchOutcome::Skipped;
        };

        tracing::info!(
            title = %item.title,
            terminal = item.terminal,
            exec = %request,
            "launching"
        );

        match self.spawner.spawn(&request) {
            Ok(()) => DispatchOutcome::Spawned(request),
            Err(e) => {
                tracing::error!(title = %item.title, error = %e, "failed to launch");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}

fn wrapped(cmd: String) -> SpawnRequest {
    SpawnRequest::Argv(vec![
        SESSION_LAUNCHER.into(),
        "--".into(),
        "sh".into(),
        "-c".into(),
        cmd,
    ])
}

/// Expand `$VAR` and `${VAR}`; unknown variables are left as written.
pub fn expand_env<F>(input: &str, mut env: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    shellexpand::env_with_context_no_errors(input, |name| env(name)).into_owned()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingSpawner {
        calls: RefCell<Vec<SpawnRequest>>,
        fail: bool,
    }

    impl Spawner for RecordingSpawner {
        fn spawn(&self, request: &SpawnRequest) -> io::Result<()> {
            self.calls.borrow_mut().push(request.clone());
            if self.fail {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            } else {
                Ok(())
            }
        }
    }

    fn item(command: &str) -> Item {
        Item {
            title: "Test".into(),
            command: command.into(),
            ..Item::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_item_wrapped_without_shell_layer() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let plan = d.plan_with_env(&item("echo hi"), no_env).unwrap();
        assert_eq!(
            plan,
            SpawnRequest::Argv(vec![
                "uwsm-app".into(),
                "--".into(),
                "sh".into(),
                "-c".into(),
                "echo hi".into()
            ])
        );
    }

    #[test]
    fn test_use_uwsm_false_runs_through_shell() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let it = Item {
            use_uwsm: false,
            ..item("ls | wc -l")
        };
        assert_eq!(
            d.plan_with_env(&it, no_env),
            Some(SpawnRequest::Shell("ls | wc -l".into()))
        );
    }

    #[test]
    fn test_existing_launcher_token_disables_wrapping() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let it = item("uwsm-app -- firefox");
        assert!(it.use_uwsm);
        assert_eq!(
            d.plan_with_env(&it, no_env),
            Some(SpawnRequest::Shell("uwsm-app -- firefox".into()))
        );
    }

    #[test]
    fn test_launcher_token_from_expansion_disables_wrapping() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let env = |name: &str| (name == "LAUNCH").then(|| "uwsm-app --".to_string());
        assert_eq!(
            d.plan_with_env(&item("$LAUNCH pavucontrol"), env),
            Some(SpawnRequest::Shell("uwsm-app -- pavucontrol".into()))
        );
    }

    #[test]
    fn test_terminal_item_always_wrapped() {
        let d = Dispatcher::new(RecordingSpawner::default(), Some("kitty".into()), "Center");
        let it = Item {
            terminal: true,
            use_uwsm: false,
            ..item("sudo pacman -Syu")
        };
        let Some(SpawnRequest::Argv(argv)) = d.plan_with_env(&it, no_env) else {
            panic!("expected argv");
        };
        assert_eq!(&argv[..4], ["uwsm-app", "--", "kitty", "--title"]);
        assert_eq!(argv[4], "Center");
        assert_eq!(argv[5], "sh");
        assert_eq!(argv[6], "-c");
        assert!(argv[7].starts_with("sudo pacman -Syu; "));
        assert!(argv[7].ends_with("read"));
    }

    #[test]
    fn test_terminal_item_with_launcher_token_still_wrapped() {
        let d = Dispatcher::new(RecordingSpawner::default(), Some("foot".into()), "T");
        let it = Item {
            terminal: true,
            ..item("uwsm-app -- btop")
        };
        let Some(SpawnRequest::Argv(argv)) = d.plan_with_env(&it, no_env) else {
            panic!("expected argv");
        };
        assert_eq!(argv[0], "uwsm-app");
        assert_eq!(argv[2], "foot");
    }

    #[test]
    fn test_terminal_item_without_terminal_falls_back() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let it = Item {
            terminal: true,
            use_uwsm: false,
            ..item("htop")
        };
        assert_eq!(
            d.plan_with_env(&it, no_env),
            Some(SpawnRequest::Argv(vec![
                "uwsm-app".into(),
                "--".into(),
                "sh".into(),
                "-c".into(),
                "htop".into()
            ]))
        );
    }

    #[test]
    fn test_blank_commands_never_spawn() {
        let d = Dispatcher::new(RecordingSpawner::default(), Some("kitty".into()), "T");
        for cmd in ["", "   ", "\t\n"] {
            assert_eq!(d.dispatch(&item(cmd)), DispatchOutcome::Skipped);
        }
        assert!(d.spawner.calls.borrow().is_empty());
    }

    #[test]
    fn test_env_expansion() {
        let env = |name: &str| match name {
            "HOME" => Some("/home/dusk".to_string()),
            _ => None,
        };
        assert_eq!(expand_env("$HOME/bin/x", env), "/home/dusk/bin/x");
        assert_eq!(expand_env("${HOME}/y", env), "/home/dusk/y");
        assert_eq!(expand_env("echo $NOPE", env), "echo $NOPE");
        assert_eq!(expand_env("cost 5$", env), "cost 5$");
    }

    #[test]
    fn test_dispatch_spawns_plan() {
        let d = Dispatcher::new(RecordingSpawner::default(), None, "T");
        let outcome = d.dispatch(&item("true"));
        assert!(matches!(outcome, DispatchOutcome::Spawned(SpawnRequest::Argv(_))));
        assert_eq!(d.spawner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_spawn_failure_is_reported_not_raised() {
        let spawner = RecordingSpawner {
            fail: true,
            ..Default::default()
        };
        let d = Dispatcher::new(spawner, None, "T");
        let outcome = d.dispatch(&item("does-not-exist"));
        assert!(matches!(outcome, DispatchOutcome::Failed(msg) if msg.contains("no such file")));
    }

    #[test]
    fn test_shell_request_argv() {
        let req = SpawnRequest::Shell("a && b".into());
        assert_eq!(req.to_argv(), ["sh", "-c", "a && b"]);
        assert_eq!(req.to_string(), "sh -c a && b");
    }
}
