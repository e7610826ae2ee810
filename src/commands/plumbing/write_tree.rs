use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Write the index out as nested tree objects and print the root id
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let tree_id = self.database().store_tree_from(&index.toc())?;
        writeln!(self.writer(), "{}", tree_id)?;

        Ok(())
    }
}
