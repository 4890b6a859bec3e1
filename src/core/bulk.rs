//! Bulk actions over the current selection of a view

use crate::core::error::SourceError;
use crate::core::notify::{NotificationKind, NotificationSink};
use crate::core::pipeline::QueryView;
use crate::core::record::Record;
use std::future::Future;

/// Run `action` over the selected records of `view`
///
/// Only selected records that are currently visible are passed to `run`,
/// in display order.
///
/// - Nothing selected: an error notification is sent and `Ok(0)` returned.
/// - Success: a success notification is sent and the selection cleared, so
///   it cannot be dispatched twice. Returns the number of records.
/// - Failure: an error notification is sent and the selection is left as
///   it was.
pub async fn dispatch_bulk<R, F, Fut>(
    view: &mut QueryView<R>,
    sink: &dyn NotificationSink,
    action: &str,
    run: F,
) -> Result<usize, SourceError>
where
    R: Record,
    F: FnOnce(Vec<R>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let records: Vec<R> = view.selected_records().into_iter().cloned().collect();
    if records.is_empty() {
        sink.notify(
            NotificationKind::Error,
            &format!("Select at least one {} to {}", R::record_type(), action),
        );
        return Ok(0);
    }

    let count = records.len();
    let record_ids: Vec<String> = records.iter().map(|r| r.id().to_string()).collect();
    tracing::debug!(record_type = R::record_type(), action, count, "dispatching bulk action");

    match run(records).await {
        Ok(()) => {
            view.clear_selection();
            sink.notify(
                NotificationKind::Success,
                &format!("{} started for {} {}(s)", action, count, R::record_type()),
            );
            Ok(count)
        }
        Err(e) => {
            let err = SourceError::BulkActionFailed {
                action: action.to_string(),
                record_ids,
                message: e.to_string(),
            };
            sink.notify(NotificationKind::Error, &err.to_string());
            Err(err)
        }
    }
}
