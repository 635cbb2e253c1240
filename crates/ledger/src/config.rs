use serde::Deserialize;

/// Award amounts that are not carried by a document. Per-event voting and
/// attendance awards live on the event itself; the daily check-in award is
/// deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardConfig {
    #[serde(default = "default_daily_check_in")]
    pub daily_check_in: i64,
}

impl Default for AwardConfig {
    fn default() -> Self {
        Self {
            daily_check_in: default_daily_check_in(),
        }
    }
}

fn default_daily_check_in() -> i64 {
    10
}
