use crate::areas::errors::GitletError;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// List branches, create a branch at HEAD, or record an upstream
    pub fn branch(&mut self, name: Option<&str>, upstream: Option<&str>) -> anyhow::Result<()> {
        match (name, upstream) {
            (None, None) => self.list_branches(),
            (None, Some(upstream)) => self.set_upstream(upstream),
            (Some(name), None) => self.create_branch(name),
            (Some(_), Some(_)) => {
                anyhow::bail!("cannot create a branch and set an upstream at once")
            }
        }
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch_name()?;

        if self.refs().head_is_detached()?
            && let Some(head) = self.refs().read_hash(HEAD_REF_NAME)?
        {
            let line = format!("* (HEAD detached at {})", head.to_short_oid());
            writeln!(self.writer(), "{}", line.as_str().green())?;
        }

        for (branch, _) in self.refs().local_heads()? {
            if Some(&branch) == current.as_ref() {
                writeln!(self.writer(), "* {}", branch.as_str().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }

    fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        let head = self
            .refs()
            .read_hash(HEAD_REF_NAME)?
            .ok_or_else(|| anyhow::anyhow!("cannot create a branch before the first commit"))?;

        let local_ref = Refs::to_local_ref(branch_name.as_ref());
        if self.refs().read_hash(&local_ref)?.is_some() {
            return Err(GitletError::BranchExists {
                name: name.to_string(),
            }
            .into());
        }

        self.refs().write_ref(&local_ref, head.as_ref())
    }

    fn set_upstream(&self, upstream: &str) -> anyhow::Result<()> {
        let Some(current) = self.refs().current_branch_name()? else {
            return Err(GitletError::Unsupported {
                what: "setting an upstream from a detached HEAD".to_string(),
            }
            .into());
        };

        let Some((remote, branch)) = upstream.split_once('/') else {
            anyhow::bail!("upstream must have the form <remote>/<branch>: {}", upstream);
        };
        BranchName::try_parse(branch.to_string())?;
        if !self.config().has_remote(remote) {
            anyhow::bail!("no remote named {}", remote);
        }

        let mut config = self.config();
        config.set_branch_upstream(&current, upstream);
        config.store()?;

        writeln!(
            self.writer(),
            "Branch '{}' set up to track '{}'.",
            current,
            upstream
        )?;

        Ok(())
    }
}
