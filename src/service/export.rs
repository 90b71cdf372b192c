//! Roster export to delimited text.
//!
//! Output is a UTF-8 CSV document prefixed with a byte-order marker so
//! right-to-left names render correctly in common spreadsheet tools.
//! Every cell is quoted; internal quotes are doubled by the writer.

use std::sync::Arc;

use crate::domain::EventId;
use crate::domain::registry::EventRegistry;
use crate::error::GatewayError;

/// UTF-8 byte-order marker prefixed to every export.
const BOM: &str = "\u{feff}";

/// Column headers, in output order.
const HEADERS: [&str; 16] = [
    "Name",
    "Mobile",
    "Email",
    "Identity Number",
    "ID Expiry",
    "Nationality",
    "Age",
    "Job",
    "Daily Rate",
    "IBAN",
    "Bank",
    "Account Holder",
    "Gender",
    "ID Document",
    "Photo",
    "Registered At",
];

/// Subscriber-roster export service.
#[derive(Debug, Clone)]
pub struct ExportService {
    registry: Arc<EventRegistry>,
}

impl ExportService {
    /// Creates a new `ExportService`.
    #[must_use]
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    /// Serializes an event's roster to delimited text, ordered by
    /// registration time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown event and
    /// [`GatewayError::NothingToExport`] when the roster is empty.
    pub async fn export(&self, event_id: EventId) -> Result<String, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;
        let entry = entry_lock.read().await;

        let roster = entry.roster();
        if roster.is_empty() {
            return Err(GatewayError::NothingToExport(event_id));
        }

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        writer
            .write_record(HEADERS)
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        for subscriber in &roster {
            let job_name = subscriber
                .requirement
                .and_then(|req_id| entry.requirements.get(&req_id))
                .map(|req| req.job.name.clone())
                .unwrap_or_default();
            let daily_rate = subscriber
                .requirement
                .and_then(|req_id| entry.requirements.get(&req_id))
                .map(|req| format!("{}", req.daily_rate))
                .unwrap_or_default();
            let expiry = subscriber
                .id_expiry_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            let gender = match subscriber.gender {
                crate::domain::Gender::Male => "male",
                crate::domain::Gender::Female => "female",
            };

            writer
                .write_record([
                    subscriber.name.as_str(),
                    subscriber.mobile.as_str(),
                    subscriber.email.as_str(),
                    subscriber.identity_number.as_str(),
                    expiry.as_str(),
                    subscriber.nationality.as_str(),
                    &subscriber.age.to_string(),
                    job_name.as_str(),
                    daily_rate.as_str(),
                    subscriber.iban.as_str(),
                    subscriber.bank_name.as_str(),
                    subscriber.account_holder.as_str(),
                    gender,
                    subscriber.id_document_url.as_str(),
                    subscriber.photo_url.as_str(),
                    &subscriber.registered_at.to_rfc3339(),
                ])
                .map_err(|e| GatewayError::Internal(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        let body = String::from_utf8(bytes).map_err(|e| GatewayError::Internal(e.to_string()))?;

        tracing::info!(event_id = %event_id, rows = roster.len(), "roster exported");
        Ok(format!("{BOM}{body}"))
    }
}
