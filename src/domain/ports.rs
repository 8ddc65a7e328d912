use crate::domain::model::BeaconMessage;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn beacon_url(&self) -> Option<&str>;
    fn morse_table_path(&self) -> &str;
    fn poll_interval(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
}

/// Remote source of Morse messages polled by the beacon loop.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// `Ok(None)` means the source answered but carried no message.
    async fn fetch(&self) -> Result<Option<BeaconMessage>>;

    fn describe(&self) -> &str;
}
