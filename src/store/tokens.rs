use anyhow::Result;

use crate::model::AppConfig;

use super::ConfigStore;

impl ConfigStore {
    /// Tokens are scoped to a PDS and account, so switching either needs a
    /// fresh login.
    pub fn token_key(&self, cfg: &AppConfig) -> String {
        format!("{}#{}", cfg.pds_url, cfg.did)
    }

    pub fn get_token(&self, cfg: &AppConfig) -> Result<Option<String>> {
        let st = self.read_state()?;
        Ok(st.session_tokens.get(&self.token_key(cfg)).cloned())
    }

    pub fn set_token(&self, cfg: &AppConfig, token: &str) -> Result<()> {
        let mut st = self.read_state()?;
        st.session_tokens
            .insert(self.token_key(cfg), token.to_string());
        self.write_state(&st)
    }

    pub fn clear_token(&self, cfg: &AppConfig) -> Result<bool> {
        let mut st = self.read_state()?;
        let removed = st.session_tokens.remove(&self.token_key(cfg)).is_some();
        if removed {
            self.write_state(&st)?;
        }
        Ok(removed)
    }
}
