use std::io::Write;

use anyhow::{bail, Result};
use crossterm::style::Stylize;

use crate::cli::RemoteCommand;
use crate::config::{Config, Remote};

pub fn exec(config: &Config, cmd: &RemoteCommand) -> Result<()> {
    let stdout = std::io::stdout();
    match cmd {
        RemoteCommand::List => print_remote_list(&mut stdout.lock(), config),
        RemoteCommand::Show { name: Some(name) } => {
            let Some(remote) = config.remotes.get(name) else {
                bail!("no such remote {name:?}");
            };
            print_remote(&mut stdout.lock(), config, name, remote)
        }
        RemoteCommand::Show { name: None } => {
            let mut out = stdout.lock();
            for (name, remote) in &config.remotes {
                print_remote(&mut out, config, name, remote)?;
            }
            Ok(())
        }
    }
}

fn is_default(config: &Config, name: &str) -> bool {
    config.default_remote.as_deref() == Some(name)
}

/// One line per remote, the default marked with a star.
fn print_remote_list(w: &mut impl Write, config: &Config) -> Result<()> {
    if config.remotes.is_empty() {
        writeln!(w, "No remotes.")?;
        return Ok(());
    }
    for (name, remote) in &config.remotes {
        if is_default(config, name) {
            writeln!(w, "* {} {}", name.as_str().green(), remote.url)?;
        } else {
            writeln!(w, "  {name} {}", remote.url)?;
        }
    }
    Ok(())
}

fn print_remote(w: &mut impl Write, config: &Config, name: &str, remote: &Remote) -> Result<()> {
    let star = if is_default(config, name) { '*' } else { ' ' };
    writeln!(w, "{star} remote: {name}")?;
    writeln!(w, "  url: {}", remote.url)?;
    writeln!(w, "  username: {}", remote.username)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_remote_config() -> Config {
        Config::from_yaml(
            "\
default_remote: beta
remotes:
  alpha:
    url: https://gerrit-review.googlesource.com
    username: stickman
    http_password: somelongstring4685
  beta:
    url: http://gerrit.example.com
    username: wonderwoman
    http_password: anotherlongstring4685
",
        )
        .unwrap()
    }

    #[test]
    fn list_marks_default_remote_with_star() {
        let config = two_remote_config();
        let mut out = Vec::new();
        print_remote_list(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  alpha https://gerrit-review.googlesource.com"));
        assert!(text.lines().any(|l| l.starts_with("* ") && l.contains("beta")));
    }

    #[test]
    fn list_with_no_remotes_prints_placeholder() {
        let mut out = Vec::new();
        print_remote_list(&mut out, &Config::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No remotes.\n");
    }

    #[test]
    fn show_prints_url_and_username() {
        let config = two_remote_config();
        let mut out = Vec::new();
        print_remote(&mut out, &config, "alpha", &config.remotes["alpha"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  remote: alpha"));
        assert!(text.contains("  url: https://gerrit-review.googlesource.com"));
        assert!(text.contains("  username: stickman"));
    }

    #[test]
    fn show_unknown_remote_fails() {
        let config = two_remote_config();
        let err = exec(&config, &RemoteCommand::Show { name: Some("gamma".into()) }).unwrap_err();
        assert!(err.to_string().contains("no such remote"));
    }
}
