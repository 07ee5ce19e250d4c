use crate::areas::repository::Repository;
use crate::artifacts::branch::head::Head;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// One `<short-hash> <title>` line per commit
    pub oneline: bool,
}

impl Repository {
    /// Walk parent links from the HEAD commit down to the root.
    pub async fn log(&mut self, opts: &LogOptions) -> anyhow::Result<()> {
        let head = self.refs().head()?;
        let head_oid = self.refs().head_commit()?;

        let mut current = head_oid.clone();
        while !current.is_zero() {
            let commit = self.database().load_commit(&current)?;
            let decoration = if current == head_oid {
                head_decoration(&head)
            } else {
                String::new()
            };

            if opts.oneline {
                self.show_commit_oneline(&current, &commit, &decoration)?;
            } else {
                self.show_commit_medium(&current, &commit, &decoration)?;
            }

            current = commit.parent().cloned().unwrap_or_default();
        }

        Ok(())
    }

    fn show_commit_medium(
        &self,
        oid: &ObjectId,
        commit: &Commit,
        decoration: &str,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(
            writer,
            "{}{}",
            format!("commit {}", oid).yellow(),
            decoration
        )?;
        writeln!(writer, "Author: {}", commit.author().name())?;
        writeln!(writer, "Date:   {}", commit.author().readable_timestamp())?;
        writeln!(writer)?;
        for message_line in commit.message().lines() {
            writeln!(writer, "    {}", message_line)?;
        }
        writeln!(writer)?;

        Ok(())
    }

    fn show_commit_oneline(
        &self,
        oid: &ObjectId,
        commit: &Commit,
        decoration: &str,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}{} {}",
            oid.to_short_oid().yellow(),
            decoration,
            commit.short_message()
        )?;

        Ok(())
    }
}

fn head_decoration(head: &Head) -> String {
    let name = match head {
        Head::Attached(branch) => format!(
            "{} -> {}",
            "HEAD".cyan().bold(),
            branch.to_string().green().bold()
        ),
        Head::Detached(_) => "HEAD".cyan().bold().to_string(),
    };

    format!(" ({})", name)
}
