use std::path::Path;

use crate::model::vo::ParameterSet;

#[async_trait::async_trait]
pub trait ParameterStore {
    async fn read(&self, path: &Path) -> anyhow::Result<ParameterSet>;
    async fn write(&self, parameters: &ParameterSet, path: &Path) -> anyhow::Result<()>;
}
