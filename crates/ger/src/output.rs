//! Console rendering of change records.

use std::io::Write;

use anyhow::Result;
use crossterm::style::{StyledContent, Stylize};
use gerlib::{ChangeInfo, ChangeStatus};

pub fn print_change_list(w: &mut impl Write, changes: &[ChangeInfo]) -> Result<()> {
    if changes.is_empty() {
        writeln!(w, "No changes.")?;
        return Ok(());
    }
    for change in changes {
        print_row(w, change)?;
    }
    Ok(())
}

fn print_row(w: &mut impl Write, change: &ChangeInfo) -> Result<()> {
    if let Some(revision) = &change.current_revision {
        write!(w, "{} ", short_sha(revision))?;
    }
    write!(w, "{}", change.number.to_string().yellow())?;
    if let Some(owner) = change.owner.as_ref().and_then(|o| o.name.as_deref()) {
        write!(w, " {}", owner.dark_grey())?;
    }
    if let Some(updated) = &change.updated {
        write!(w, " {}", updated.format("%b %d %H:%M").to_string().magenta())?;
    }
    write!(w, " {}", change.project.as_str().cyan())?;
    write!(w, " {}", styled_status(change.status))?;
    writeln!(w, " {}", change.subject)?;
    Ok(())
}

pub fn print_change(w: &mut impl Write, change: &ChangeInfo) -> Result<()> {
    writeln!(w, "{} {}", "change".green(), change.number)?;
    writeln!(w, "Subject: {}", change.subject)?;
    writeln!(w, "Project: {} ({})", change.project, change.branch)?;
    writeln!(w, "Status:  {}", styled_status(change.status))?;
    if let Some(owner) = &change.owner {
        let name = owner.name.as_deref().unwrap_or("?");
        match &owner.email {
            Some(email) => writeln!(w, "Owner:   {name} <{email}>")?,
            None => writeln!(w, "Owner:   {name}")?,
        }
    }
    if let Some(updated) = &change.updated {
        writeln!(w, "Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"))?;
    }
    for (state, accounts) in &change.reviewers {
        let names: Vec<&str> = accounts
            .iter()
            .map(|a| a.name.as_deref().unwrap_or("?"))
            .collect();
        writeln!(w, "{}: {}", state.as_str(), names.join(", "))?;
    }
    if let Some(revision) = &change.current_revision {
        writeln!(w, "Current: {}", short_sha(revision))?;
    }
    Ok(())
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn styled_status(status: ChangeStatus) -> StyledContent<&'static str> {
    match status {
        ChangeStatus::New => "NEW".green(),
        ChangeStatus::Merged => "MERGED".blue(),
        ChangeStatus::Abandoned => "ABANDONED".dark_red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gerlib::{AccountInfo, ChangeStatus};

    fn sample_change() -> ChangeInfo {
        ChangeInfo {
            id: "demo~master~I11".into(),
            project: "demo".into(),
            branch: "master".into(),
            topic: None,
            change_id: Some("I11".into()),
            subject: "Implement feature X".into(),
            status: ChangeStatus::New,
            updated: None,
            number: 3965,
            owner: Some(AccountInfo {
                name: Some("J. Doe".into()),
                ..Default::default()
            }),
            current_revision: Some("27cc4558b5a3d3387dd11ee2df7a117e7e581822".into()),
            reviewers: vec![],
            revisions: vec![],
        }
    }

    #[test]
    fn list_output_contains_key_columns() {
        let mut out = Vec::new();
        print_change_list(&mut out, &[sample_change()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("27cc455"));
        assert!(text.contains("3965"));
        assert!(text.contains("J. Doe"));
        assert!(text.contains("Implement feature X"));
    }

    #[test]
    fn empty_list_prints_placeholder() {
        let mut out = Vec::new();
        print_change_list(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No changes.\n");
    }

    #[test]
    fn show_output_lists_reviewers_by_state() {
        let mut change = sample_change();
        change.reviewers = vec![(
            gerlib::ReviewerState::Cc,
            vec![AccountInfo {
                name: Some("C. Coe".into()),
                ..Default::default()
            }],
        )];
        let mut out = Vec::new();
        print_change(&mut out, &change).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CC: C. Coe"));
    }
}
