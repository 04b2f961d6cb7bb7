use serde::Serialize;

/// URLs derived from a device detail snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceLinks {
    /// Latest still image, cache-busted with the epoch second it was built at.
    pub image_url: String,
    pub stream_url: String,
    pub upload_url: Option<String>,
}

impl DeviceLinks {
    pub fn build(device_id: &str, ip: Option<&str>, upload_port: u16, epoch_secs: i64) -> Self {
        Self {
            image_url: format!("/device/{device_id}/last_img?{epoch_secs}"),
            stream_url: format!("/device/{device_id}/stream"),
            upload_url: ip
                .filter(|ip| !ip.is_empty())
                .map(|ip| format!("http://{ip}:{upload_port}/upload/{device_id}")),
        }
    }
}
