use crate::areas::repository::Repository;

impl Repository {
    /// Point the terminal ref behind `name` at the commit `value` resolves to
    pub fn update_ref(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        let oid = self.resolve_commit(value)?;
        let terminal = self.refs().terminal(name)?;
        self.refs().write_ref(&terminal, oid.as_ref())
    }
}
