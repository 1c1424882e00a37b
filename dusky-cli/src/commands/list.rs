use std::fmt::Write as _;

use dusky_core::config::Config;

pub fn run_list(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", render_tree(config));
    }
    Ok(())
}

/// Plain-text outline of pages, groups and items
pub fn render_tree(config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}x{})",
        config.window.title, config.window.width, config.window.height
    );

    if config.pages.is_empty() {
        let _ = writeln!(out, "  (no pages)");
        return out;
    }

    for page in &config.pages {
        let _ = writeln!(out, "{} [{}]", page.name, page.icon);
        for group in &page.groups {
            let title = if group.title.is_empty() {
                "(untitled group)"
            } else {
                group.title.as_str()
            };
            let _ = writeln!(out, "  {}", title);
            for item in &group.items {
                let mut flags = String::new();
                if item.terminal {
                    flags.push_str(" [terminal]");
                }
                if !item.use_uwsm {
                    flags.push_str(" [no uwsm]");
                }
                let command = if item.command.trim().is_empty() {
                    "-"
                } else {
                    item.command.as_str()
                };
                let _ = writeln!(out, "    - {}: {}{}", item.title, command, flags);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let yaml = r#"
window:
  title: Center
pages:
  - name: Apps
    icon: app-symbolic
    groups:
      - title: Web
        items:
          - title: Browser
            command: firefox
          - title: Shell
            command: zsh
            terminal: true
            use_uwsm: false
      - items:
          - title: Empty
"#;
        let config = Config::from_str(yaml).unwrap();
        let expected = "\
Center (950x650)
Apps [app-symbolic]
  Web
    - Browser: firefox
    - Shell: zsh [terminal] [no uwsm]
  (untitled group)
    - Empty: -
";
        assert_eq!(render_tree(&config), expected);
    }

    #[test]
    fn test_render_no_pages() {
        let out = render_tree(&Config::default());
        assert!(out.ends_with("(no pages)\n"));
    }
}
