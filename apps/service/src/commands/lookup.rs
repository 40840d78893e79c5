use mutscope_enzymes::{CatalogLookup, ChainedLookup, DeadlineLookup, EnzymeLookup, NoLookup};
use mutscope_remote::RemoteLookup;

use crate::config::{LookupConfig, LookupMode};
use crate::error::ServiceError;

/// Build the enzyme lookup selected by configuration.
///
/// Remote lookups are always wrapped in the configured deadline.
pub fn build_lookup(config: &LookupConfig) -> Result<Box<dyn EnzymeLookup>, ServiceError> {
    let lookup: Box<dyn EnzymeLookup> = match config.mode {
        LookupMode::None => Box::new(NoLookup),
        LookupMode::Catalog => Box::new(CatalogLookup::builtin()),
        LookupMode::Remote => Box::new(remote(config)?),
        LookupMode::CatalogThenRemote => {
            let mut stages: Vec<Box<dyn EnzymeLookup>> = Vec::with_capacity(2);
            stages.push(Box::new(CatalogLookup::builtin()));
            stages.push(Box::new(remote(config)?));
            Box::new(ChainedLookup::new(stages))
        }
    };

    tracing::debug!(mode = ?config.mode, lookup = lookup.name(), "enzyme lookup ready");
    Ok(lookup)
}

fn remote(config: &LookupConfig) -> Result<DeadlineLookup<RemoteLookup>, ServiceError> {
    let remote = RemoteLookup::new(&config.remote_settings())
        .map_err(|e| ServiceError::Internal(format!("could not build remote lookup: {e}")))?;
    Ok(DeadlineLookup::new(remote, config.deadline()))
}
