//! Query parameters for the freshness audit.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::audit::DEFAULT_STALE_AFTER_DAYS;

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub stale_after_days: Option<i64>,
}

impl AuditQuery {
    pub fn stale_after_days(&self) -> i64 {
        self.stale_after_days.unwrap_or(DEFAULT_STALE_AFTER_DAYS)
    }
}
