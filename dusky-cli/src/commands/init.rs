//! `dusky init` command - writes a starter dusky_config.yaml

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use dusky_core::config::{Config, Group, Item, Page, WindowConfig};
use dusky_core::terminal::locate;

/// A starter entry, offered only when its program is installed
struct Candidate {
    program: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    command: &'static str,
    terminal: bool,
}

const SYSTEM: &[Candidate] = &[
    Candidate {
        program: "pacman",
        title: "Update System",
        description: "Synchronise and upgrade all packages",
        icon: "software-update-available-symbolic",
        command: "sudo pacman -Syu",
        terminal: true,
    },
    Candidate {
        program: "btop",
        title: "System Monitor",
        description: "Processes, memory & disks",
        icon: "utilities-system-monitor-symbolic",
        command: "btop",
        terminal: true,
    },
    Candidate {
        program: "htop",
        title: "Process Viewer",
        description: "Interactive process list",
        icon: "utilities-system-monitor-symbolic",
        command: "htop",
        terminal: true,
    },
];

const DESKTOP: &[Candidate] = &[
    Candidate {
        program: "pavucontrol",
        title: "Audio Mixer",
        description: "Volume and device routing",
        icon: "audio-volume-high-symbolic",
        command: "pavucontrol",
        terminal: false,
    },
    Candidate {
        program: "nm-connection-editor",
        title: "Network Connections",
        description: "Wired, Wi-Fi & VPN profiles",
        icon: "network-wireless-symbolic",
        command: "nm-connection-editor",
        terminal: false,
    },
    Candidate {
        program: "blueman-manager",
        title: "Bluetooth",
        description: "Pair and manage devices",
        icon: "bluetooth-symbolic",
        command: "blueman-manager",
        terminal: false,
    },
    Candidate {
        program: "nautilus",
        title: "Files",
        description: "Open the home folder",
        icon: "system-file-manager-symbolic",
        command: "nautilus $HOME",
        terminal: false,
    },
];

/// Run the init command
pub fn run_init(path: &Path, yes: bool) -> anyhow::Result<()> {
    if path.exists() {
        if !yes {
            bail!(
                "Config file {} already exists. Use --yes to overwrite.",
                path.display()
            );
        }
        println!("Overwriting existing config: {}", path.display());
    }

    let config = starter_config(path, |program| locate(program).is_some());
    println!(
        "Detected {} launcher item(s) on this system.\n",
        config.item_count().saturating_sub(1)
    );

    let yaml = serde_yaml::to_string(&config).context("Failed to render config")?;
    fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created: {}\n", path.display());
    println!("Next steps:");
    println!("  1. Review and customize {}", path.display());
    println!("  2. Run `dusky` to open the control center");

    Ok(())
}

/// Build the starter config, keeping candidates whose program passes `installed`
pub fn starter_config<F>(path: &Path, installed: F) -> Config
where
    F: Fn(&str) -> bool,
{
    let items = |candidates: &[Candidate]| -> Vec<Item> {
        candidates
            .iter()
            .filter(|c| installed(c.program))
            .map(|c| Item {
                title: c.title.into(),
                description: c.description.into(),
                icon: c.icon.into(),
                command: c.command.into(),
                terminal: c.terminal,
                use_uwsm: true,
            })
            .collect()
    };

    let edit = Item {
        title: "Edit This Menu".into(),
        description: "Open the launcher config in $EDITOR".into(),
        icon: "document-edit-symbolic".into(),
        command: format!("${{EDITOR:-nano}} '{}'", path.display()),
        terminal: true,
        use_uwsm: true,
    };

    let mut system = items(SYSTEM);
    system.push(edit);

    let mut pages = vec![Page {
        name: "System".into(),
        icon: "emblem-system-symbolic".into(),
        groups: vec![Group {
            title: "Maintenance".into(),
            items: system,
        }],
    }];

    let desktop = items(DESKTOP);
    if !desktop.is_empty() {
        pages.push(Page {
            name: "Desktop".into(),
            icon: "preferences-desktop-symbolic".into(),
            groups: vec![Group {
                title: "Settings & Devices".into(),
                items: desktop,
            }],
        });
    }

    Config {
        window: WindowConfig::default(),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_keeps_installed_programs() {
        let path = Path::new("/opt/dusky/dusky_config.yaml");
        let config = starter_config(path, |p| p == "btop" || p == "pavucontrol");

        assert_eq!(config.pages.len(), 2);
        let system = &config.pages[0].groups[0].items;
        assert_eq!(system.len(), 2);
        assert_eq!(system[0].command, "btop");
        assert!(system[1].command.contains("/opt/dusky/dusky_config.yaml"));
        assert_eq!(config.pages[1].groups[0].items[0].command, "pavucontrol");
    }

    #[test]
    fn test_starter_without_desktop_tools() {
        let config = starter_config(Path::new("c.yaml"), |_| false);
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.item_count(), 1);
    }

    #[test]
    fn test_starter_round_trips_through_loader() {
        let config = starter_config(Path::new("c.yaml"), |_| true);
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(Config::from_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dusky_config.yaml");
        fs::write(&path, "pages: []\n").unwrap();

        let err = run_init(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "pages: []\n");
    }
}
