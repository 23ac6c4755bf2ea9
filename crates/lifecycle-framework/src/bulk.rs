//! # Bulk Operations
//!
//! `activate_many`, `deactivate_many` and `delete_many` run the single-item
//! operation for each id **sequentially, in input order**, and never stop on
//! a failure. The envelope is always successful; per-item failures live in
//! the [`BulkReport`] and are summarized in the envelope's `error` field.

use crate::client::ResourceClient;
use crate::entity::{entity_type, LifecycleEntity};
use crate::envelope::ApiResult;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

/// Per-id outcome of a bulk call.
///
/// `successful` and `errors` partition the input ids in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub successful: Vec<String>,
    pub errors: Vec<BulkFailure>,
    pub total_processed: usize,
    pub successful_count: usize,
    pub error_count: usize,
}

impl BulkReport {
    pub fn record<R>(&mut self, id: &str, outcome: &ApiResult<R>) {
        self.total_processed += 1;
        if outcome.success {
            self.successful.push(id.to_string());
            self.successful_count += 1;
        } else {
            self.errors.push(BulkFailure {
                id: id.to_string(),
                error: outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("Error {}", outcome.status)),
            });
            self.error_count += 1;
        }
    }

    /// `"{n} of {total} operations failed"`, or `None` when all succeeded.
    pub fn summary(&self) -> Option<String> {
        (self.error_count > 0).then(|| {
            format!(
                "{} of {} operations failed",
                self.error_count, self.total_processed
            )
        })
    }

    pub fn into_result(self) -> ApiResult<BulkReport> {
        let summary = self.summary();
        ApiResult {
            data: Some(self),
            error: summary,
            status: 200,
            success: true,
        }
    }
}

macro_rules! bulk_operation {
    ($prefix:ident => $op:ident) => {
        paste::paste! {
            #[doc = concat!("Runs `", stringify!($op), "` for every id in order and reports each outcome.")]
            #[instrument(skip(self, ids))]
            pub async fn [<$prefix _many>]<I, S>(&self, ids: I) -> ApiResult<BulkReport>
            where
                I: IntoIterator<Item = S>,
                S: AsRef<str>,
            {
                let mut report = BulkReport::default();
                for id in ids {
                    let id = id.as_ref();
                    let outcome = self.$op(id).await;
                    report.record(id, &outcome);
                }
                info!(
                    entity_type = entity_type::<T>(),
                    operation = stringify!([<$prefix _many>]),
                    total = report.total_processed,
                    failed = report.error_count,
                    "Bulk operation finished"
                );
                report.into_result()
            }
        }
    };
}

impl<T: LifecycleEntity> ResourceClient<T> {
    bulk_operation!(activate => activate);
    bulk_operation!(deactivate => deactivate);
    bulk_operation!(delete => hard_delete);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::validation::ValidationError;

    #[test]
    fn test_report_partitions_ids_in_order() {
        let mut report = BulkReport::default();
        report.record("1", &ApiResult::ok(200, ()));
        report.record(
            "2",
            &ApiResult::<()>::failure(&ClientError::Http {
                status: 404,
                message: "Error 404: Not Found".into(),
            }),
        );
        report.record("", &ApiResult::<()>::failure(&ValidationError::Required("id").into()));

        assert_eq!(report.successful, vec!["1"]);
        assert_eq!(report.errors[0].id, "2");
        assert_eq!(report.errors[1].error, "id is required");
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.successful_count + report.error_count, report.total_processed);

        let result = report.into_result();
        assert!(result.success);
        assert_eq!(result.error.as_deref(), Some("2 of 3 operations failed"));
    }

    #[test]
    fn test_empty_report_has_no_summary() {
        let result = BulkReport::default().into_result();
        assert!(result.success);
        assert_eq!(result.error, None);
        assert_eq!(result.data.map(|r| r.total_processed), Some(0));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_value(BulkReport::default()).unwrap();
        assert!(json.get("totalProcessed").is_some());
        assert!(json.get("errorCount").is_some());
    }
}
