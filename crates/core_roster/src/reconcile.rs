use std::collections::HashSet;
use std::pin::pin;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::directory::SlackDirectory;
use crate::error::Result;
use crate::model::{format_added_on, MappingSet, MemberId, Profile, UserMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Keep prior mappings whose member no longer appears in the channel.
    /// Off by default: the output replaces the prior set outright.
    pub retain_departed: bool,
    /// Profile lookups allowed in flight at once. Output order is unaffected.
    pub lookup_concurrency: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            retain_departed: false,
            lookup_concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    LookupFailed(String),
    Bot,
    Deleted,
    BlankName,
    Duplicate,
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::LookupFailed(message) => format!("lookup failed: {message}"),
            SkipReason::Bot => "bot account".to_string(),
            SkipReason::Deleted => "deleted account".to_string(),
            SkipReason::BlankName => "no real name".to_string(),
            SkipReason::Duplicate => "listed more than once".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    pub user_id: MemberId,
    pub reason: SkipReason,
}

/// Result of one pass. `mappings` supersedes the prior set in whole.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub mappings: MappingSet,
    pub skipped: Vec<SkippedMember>,
    /// Prior mappings carried over for departed members (`retain_departed`).
    pub retained: usize,
}

impl Reconciliation {
    pub fn lookup_failures(&self) -> impl Iterator<Item = &SkippedMember> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::LookupFailed(_)))
    }
}

/// Resolves enumerated members into mappings, merging with the prior set by
/// identifier and preserving each member's first-seen date.
pub struct Reconciler<'a, D: ?Sized> {
    directory: &'a D,
    options: ReconcileOptions,
}

impl<'a, D> Reconciler<'a, D>
where
    D: SlackDirectory + ?Sized,
{
    pub fn new(directory: &'a D, options: ReconcileOptions) -> Self {
        Self { directory, options }
    }

    pub async fn reconcile(
        &self,
        identifiers: &[MemberId],
        prior: &MappingSet,
    ) -> Result<Reconciliation> {
        self.reconcile_on(identifiers, prior, Utc::now().date_naive())
            .await
    }

    /// Same as [`Reconciler::reconcile`] with an explicit "today" used as the
    /// first-seen date of new members.
    pub async fn reconcile_on(
        &self,
        identifiers: &[MemberId],
        prior: &MappingSet,
        today: NaiveDate,
    ) -> Result<Reconciliation> {
        let added_today = format_added_on(today);
        let mut result = Reconciliation::default();

        let mut seen: HashSet<&MemberId> = HashSet::with_capacity(identifiers.len());
        let mut unique = Vec::with_capacity(identifiers.len());
        for id in identifiers {
            if seen.insert(id) {
                unique.push(id);
            } else {
                debug!("member {} listed more than once; keeping first", id);
                result.skipped.push(SkippedMember {
                    user_id: id.clone(),
                    reason: SkipReason::Duplicate,
                });
            }
        }

        let directory = self.directory;
        // Lookups own their id; borrowed ids make the pass future non-`Send`.
        let mut lookups = pin!(stream::iter(unique.into_iter().cloned().map(move |id| async move {
            let lookup = directory.get_profile(&id).await;
            (id, lookup)
        }))
        .buffered(self.options.lookup_concurrency.max(1)));

        while let Some((id, lookup)) = lookups.next().await {
            let profile = match lookup {
                Ok(profile) => profile,
                Err(err) if err.is_recoverable_lookup() => {
                    warn!("skipping member {}: {}", id, err);
                    result.skipped.push(SkippedMember {
                        user_id: id.clone(),
                        reason: SkipReason::LookupFailed(err.to_string()),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            if let Some(reason) = exclusion(&profile) {
                debug!("skipping member {}: {}", id, reason.describe());
                result.skipped.push(SkippedMember {
                    user_id: id.clone(),
                    reason,
                });
                continue;
            }

            let added_on = prior
                .get(&id)
                .map(|existing| existing.added_on.clone())
                .unwrap_or_else(|| added_today.clone());

            result.mappings.insert(UserMapping {
                user_id: id,
                real_name: profile.real_name.trim().to_string(),
                slack_tag: profile.slack_tag(),
                added_on,
            });
        }

        if self.options.retain_departed {
            for mapping in prior.iter() {
                if !seen.contains(&mapping.user_id) && result.mappings.insert(mapping.clone()) {
                    result.retained += 1;
                }
            }
        }

        info!(
            "reconciled {} members: {} mapped, {} skipped, {} retained",
            identifiers.len(),
            result.mappings.len() - result.retained,
            result.skipped.len(),
            result.retained
        );
        Ok(result)
    }
}

fn exclusion(profile: &Profile) -> Option<SkipReason> {
    if profile.is_bot {
        Some(SkipReason::Bot)
    } else if profile.is_deleted {
        Some(SkipReason::Deleted)
    } else if profile.real_name.trim().is_empty() {
        Some(SkipReason::BlankName)
    } else {
        None
    }
}
