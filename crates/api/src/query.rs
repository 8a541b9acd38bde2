//! Shared query parameter types for API handlers.

use serde::Deserialize;
use voicepath_core::progress::ExportFormat;
use voicepath_core::types::DbId;

/// `?user_id=` scoping for list endpoints.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: DbId,
}

/// `?format=text|json` for export endpoints. Defaults to text.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}
