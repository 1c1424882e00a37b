//! Terminal emulator detection and invocation
//!
//! Finds the first installed terminal from a fixed preference list and builds
//! the argument vector that makes it run a shell command. Every emulator has
//! its own flags for the window title and for "execute this".

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Supported terminals in order of preference
pub const TERMINALS: [&str; 7] = [
    "kitty",
    "foot",
    "alacritty",
    "wezterm",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
];

/// Appended to commands run with `wait` so the window stays open
pub const WAIT_SUFFIX: &str = r#"; echo ""; echo "Press Enter to close..."; read"#;

/// Return the first terminal found on `PATH`, or `None`.
pub fn find_terminal() -> Option<String> {
    find_terminal_with(|name| which::which(name).is_ok()).map(str::to_string)
}

/// Like [`find_terminal`], searching an explicit `PATH`-style list instead.
pub fn find_terminal_in(paths: impl AsRef<OsStr>, cwd: &Path) -> Option<String> {
    let paths = paths.as_ref();
    find_terminal_with(|name| which::which_in(name, Some(paths), cwd).is_ok()).map(str::to_string)
}

/// Full path of `program` if it is on `PATH`
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Preference walk with a caller-supplied availability check
pub fn find_terminal_with<F>(mut is_available: F) -> Option<&'static str>
where
    F: FnMut(&str) -> bool,
{
    TERMINALS.into_iter().find(|name| is_available(name))
}

/// Build the argv that runs `shell_cmd` through `sh -c` inside `terminal`.
///
/// With `wait`, the command is followed by a prompt and a blocking `read` in
/// the same shell so the output stays readable. Unknown terminals get the
/// generic `-e sh -c` form.
pub fn build_terminal_cmd(terminal: &str, title: &str, shell_cmd: &str, wait: bool) -> Vec<String> {
    let full_cmd = if wait {
        format!("{shell_cmd}{WAIT_SUFFIX}")
    } else {
        shell_cmd.to_string()
    };

    let gnome_title = format!("--title={title}");
    let mut args: Vec<&str> = vec![terminal];
    match terminal {
        "kitty" | "foot" => args.extend(["--title", title]),
        "alacritty" | "konsole" => args.extend(["--title", title, "-e"]),
        "wezterm" => args.extend(["start", "--"]),
        "gnome-terminal" => args.extend([gnome_title.as_str(), "--wait", "--"]),
        "xfce4-terminal" => args.extend(["--title", title, "-x"]),
        _ => args.push("-e"),
    }
    args.extend(["sh", "-c", full_cmd.as_str()]);
    args.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_terminals_end_with_sh_c() {
        for term in TERMINALS {
            let args = build_terminal_cmd(term, "Title", "echo hi", true);
            let n = args.len();
            assert_eq!(args[0], term);
            assert_eq!(args[n - 3], "sh", "{term}");
            assert_eq!(args[n - 2], "-c", "{term}");
            assert!(args[n - 1].starts_with("echo hi; "), "{term}");
            assert!(args[n - 1].ends_with("; read"), "{term}");
        }
    }

    #[test]
    fn test_wait_suffix_appended_to_command_string() {
        let args = build_terminal_cmd("kitty", "T", "make", true);
        assert_eq!(
            args.last().unwrap(),
            r#"make; echo ""; echo "Press Enter to close..."; read"#
        );
    }

    #[test]
    fn test_no_wait_leaves_command_alone() {
        let args = build_terminal_cmd("foot", "T", "htop", false);
        assert_eq!(args, ["foot", "--title", "T", "sh", "-c", "htop"]);
    }

    #[test]
    fn test_emulator_specific_flags() {
        assert_eq!(
            build_terminal_cmd("alacritty", "T", "x", false),
            ["alacritty", "--title", "T", "-e", "sh", "-c", "x"]
        );
        assert_eq!(
            build_terminal_cmd("wezterm", "T", "x", false),
            ["wezterm", "start", "--", "sh", "-c", "x"]
        );
        assert_eq!(
            build_terminal_cmd("gnome-terminal", "My T", "x", false),
            ["gnome-terminal", "--title=My T", "--wait", "--", "sh", "-c", "x"]
        );
        assert_eq!(
            build_terminal_cmd("konsole", "T", "x", false),
            ["konsole", "--title", "T", "-e", "sh", "-c", "x"]
        );
        assert_eq!(
            build_terminal_cmd("xfce4-terminal", "T", "x", false),
            ["xfce4-terminal", "--title", "T", "-x", "sh", "-c", "x"]
        );
    }

    #[test]
    fn test_unknown_terminal_generic_form() {
        assert_eq!(
            build_terminal_cmd("urxvt", "T", "x", false),
            ["urxvt", "-e", "sh", "-c", "x"]
        );
    }

    #[test]
    fn test_find_terminal_prefers_earliest() {
        let found = find_terminal_with(|name| name == "konsole" || name == "foot");
        assert_eq!(found, Some("foot"));
    }

    #[test]
    fn test_find_terminal_none() {
        assert_eq!(find_terminal_with(|_| false), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_terminal_in_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        for name in ["konsole", "alacritty"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = find_terminal_in(dir.path().as_os_str(), dir.path());
        assert_eq!(found.as_deref(), Some("alacritty"));

        let empty = tempfile::tempdir().unwrap();
        assert_eq!(find_terminal_in(empty.path().as_os_str(), empty.path()), None);
    }
}
