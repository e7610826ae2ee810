use crate::areas::repository::Repository;

impl Repository {
    /// Record a new peer repository under `remote.<name>.url`
    pub fn remote_add(&mut self, name: &str, url: &str) -> anyhow::Result<()> {
        let mut config = self.config();
        config.add_remote(name, url)?;
        config.store()
    }
}
