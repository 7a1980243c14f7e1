use core_roster::{
    MemberEnumerator, ReconcileOptions, Reconciler, Reconciliation, Result, SlackDirectory,
};
use roster_store::MappingStore;
use tracing::info;

/// One full refresh: enumerate the channel, reconcile against the stored set,
/// then persist the result. Nothing is written if enumeration fails.
pub async fn sync_channel<D>(
    directory: &D,
    store: &MappingStore,
    channel: &str,
    options: ReconcileOptions,
) -> Result<Reconciliation>
where
    D: SlackDirectory + ?Sized,
{
    let identifiers = MemberEnumerator::new(directory).enumerate(channel).await?;
    info!("channel {} has {} members", channel, identifiers.len());

    let prior = store.load()?;
    let reconciliation = Reconciler::new(directory, options)
        .reconcile(&identifiers, &prior)
        .await?;

    store.save(&reconciliation.mappings)?;
    Ok(reconciliation)
}
