use jiak_carpark::{CarparkRecord, DatamallClient, PageLimits};
use jiak_core::AppConfig;

use crate::print_json;

/// Fetches every availability page and prints the records whose development
/// matches `development` (all of them when `None`).
///
/// # Errors
///
/// Fails when no account key is configured or when any page fails; nothing
/// is printed in that case.
pub(crate) async fn run_carparks(config: &AppConfig, development: Option<&str>) -> anyhow::Result<()> {
    let Some(key) = config.datamall_account_key.as_deref() else {
        anyhow::bail!("DATAMALL_ACCOUNT_KEY is required for carpark availability");
    };
    let client = DatamallClient::with_base_url(
        key,
        config.http_timeout_secs,
        &config.user_agent,
        &config.datamall_base_url,
    )?;
    let limits = PageLimits::new(config.carpark_page_size, config.carpark_max_pages)?;

    let records = client.fetch_all_carparks(limits).await.map_err(|e| {
        if let Some(offset) = e.failed_offset() {
            tracing::error!(offset, error = %e, "carpark page failed");
        }
        e
    })?;

    let term = development.unwrap_or_default();
    let matching: Vec<&CarparkRecord> = records
        .iter()
        .filter(|r| r.matches_development(term))
        .collect();
    tracing::info!(total = records.len(), matching = matching.len(), "carpark availability fetched");
    print_json(&matching)
}
