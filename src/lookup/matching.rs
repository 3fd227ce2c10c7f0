use tracing::warn;

use crate::api::ListPage;
use crate::utils::{OcmError, Result};

/// The one record of a search that must match exactly once
///
/// `total` is the server-side count, so a page cut short by `size` still
/// reports every match.
pub(super) fn single_match<T>(
    page: ListPage<T>,
    kind: &'static str,
    qualifier: &'static str,
    key: &str,
) -> Result<T> {
    if page.total != 1 {
        return Err(OcmError::MatchCount {
            kind,
            qualifier,
            key: key.to_string(),
            total: page.total,
            expected_one: true,
        });
    }

    page.into_single().ok_or_else(|| {
        warn!("Search for {} '{}' counted 1 match but sent no items", kind, key);
        OcmError::EmptyPage {
            kind,
            qualifier,
            key: key.to_string(),
        }
    })
}
