use std::path::Path;

use dusky_core::bootstrap::{Requirements, install_command, missing_packages};
use dusky_core::config::Config;
use dusky_core::dispatch::SESSION_LAUNCHER;
use dusky_core::terminal::{TERMINALS, find_terminal, locate};

use crate::bootstrap::DlopenProbe;

#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl Check {
    fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            hint: None,
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn run_doctor(config_path: &Path) -> anyhow::Result<()> {
    println!("Dusky Doctor\n");
    println!("Checking environment...\n");

    let terminal = find_terminal();

    let checks = vec![
        check_terminal(terminal.as_deref()),
        check_program(SESSION_LAUNCHER, "install uwsm, or set `use_uwsm: false` on items"),
        check_program("sh", "a POSIX shell is needed to run item commands"),
        check_gtk(),
    ];

    println!("Environment:");
    for check in &checks {
        print_check(check);
    }
    println!();

    println!("Configuration: {}", config_path.display());
    println!();

    let mut warnings: Vec<Check> = Vec::new();
    match Config::load(config_path) {
        Ok(config) => {
            println!("Items:");
            for check in check_config(&config, terminal.as_deref()) {
                print_check(&check);
                if !check.passed {
                    warnings.push(check);
                }
            }
        }
        Err(e) => {
            let check = Check::fail("config", e.to_string())
                .with_hint("Run `dusky init` to create one, or pass --config");
            print_check(&check);
            warnings.push(check);
        }
    }
    println!();

    // === Summary ===
    let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();

    if failed.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    } else {
        if !failed.is_empty() {
            println!("Issues found:");
            for check in &failed {
                println!("  - {}: {}", check.name, check.message);
                if let Some(hint) = &check.hint {
                    println!("    Hint: {}", hint);
                }
            }
        }
        if !warnings.is_empty() {
            println!("\nWarnings: {} issue(s) with the configuration", warnings.len());
        }
    }

    Ok(())
}

fn print_check(check: &Check) {
    let icon = if check.passed { "✓" } else { "✗" };
    let color = if check.passed { "\x1b[32m" } else { "\x1b[31m" };
    let reset = "\x1b[0m";

    println!(
        "  {}{}{} {}: {}",
        color, icon, reset, check.name, check.message
    );

    if let Some(hint) = &check.hint {
        println!("    └─ {}", hint);
    }
}

fn check_terminal(terminal: Option<&str>) -> Check {
    match terminal {
        Some(name) => Check::ok("terminal", name),
        None => Check::fail("terminal", "none found")
            .with_hint(format!("Install one of: {}", TERMINALS.join(", "))),
    }
}

fn check_program(program: &str, hint: &str) -> Check {
    match locate(program) {
        Some(path) => Check::ok(program, path.display().to_string()),
        None => Check::fail(program, "not on PATH").with_hint(hint),
    }
}

fn check_gtk() -> Check {
    let missing = missing_packages(&Requirements::gtk(), &DlopenProbe);
    if missing.is_empty() {
        Check::ok("gtk", "gtk4 + libadwaita available")
    } else {
        Check::fail("gtk", format!("missing {}", missing.join(", ")))
            .with_hint(format!("Only needed for --frontend gtk: {}", install_command(&missing)))
    }
}

/// Per-item checks, grouped under their page name
pub fn check_config(config: &Config, terminal: Option<&str>) -> Vec<Check> {
    if config.pages.is_empty() {
        return vec![Check::ok("pages", "no pages defined")];
    }

    let mut checks = Vec::new();

    for (page, item) in config.items() {
        let name = format!("{} / {}", page.name, item.title);
        let mut issues = Vec::new();

        if item.command.trim().is_empty() {
            issues.push("no command, Run does nothing".to_string());
        }
        if item.terminal && terminal.is_none() {
            issues.push("no terminal available, runs in background".to_string());
        }

        if issues.is_empty() {
            let mut flags = String::new();
            if item.terminal {
                flags.push_str(" [terminal]");
            }
            if !item.use_uwsm {
                flags.push_str(" [no uwsm]");
            }
            checks.push(Check::ok(name, format!("ok{}", flags)));
        } else {
            checks.push(Check::fail(name, issues.join(", ")));
        }
    }

    if checks.is_empty() {
        checks.push(Check::ok("items", "no items defined"));
    }

    checks
}
