use serde::Deserialize;

fn default_rate_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) database_host: String,
    pub(crate) database_port: u16,
    pub(crate) database_name: String,
    pub(crate) database_user: String,
    pub(crate) database_password: String,
    pub(crate) log_level: String,
    pub(crate) port: u16,
    pub(crate) secret: String,
    pub(crate) aws_region: String,
    pub(crate) aws_access_key_id: String,
    pub(crate) aws_secret_access_key: String,
    pub(crate) videos_bucket: String,
    /// Holds extracted video frames. Media kits carry no thumbnails without it.
    pub(crate) frames_bucket: Option<String>,
    pub(crate) state_machine_arn: String,
    /// Overrides the regional Step Functions endpoint, e.g. for a local emulator.
    pub(crate) pipeline_endpoint: Option<String>,
    #[serde(default = "default_rate_limit")]
    pub(crate) rate_limit: u64,
}

impl Args {
    pub(crate) fn database_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }
}
