// Device-name resolution for newly created access-list entries.

use async_trait::async_trait;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{AccessListEntry, KnownDevice, MacAddress};

/// Source of the devices the router knows about.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn known_devices(&self) -> Result<Vec<KnownDevice>, CoreError>;
}

/// Label used when no name is supplied and no known device matches.
pub fn placeholder_name(mac: &MacAddress) -> String {
    format!("Unknown device {mac}")
}

/// Build the entry for a device that is in neither list.
///
/// A caller-supplied name wins. Otherwise the directory is queried on
/// every call (no caching) and the matching device's name is used.
pub async fn resolve_entry<D>(
    directory: &D,
    mac: &MacAddress,
    name: Option<&str>,
) -> Result<AccessListEntry, CoreError>
where
    D: DeviceDirectory + ?Sized,
{
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return Ok(AccessListEntry::new(*mac, name));
    }

    let devices = directory.known_devices().await?;
    let found = devices
        .iter()
        .find(|device| device.mac().as_ref() == Some(mac))
        .and_then(KnownDevice::name);

    let name = if let Some(name) = found {
        name.to_owned()
    } else {
        debug!(%mac, "cannot find known device");
        placeholder_name(mac)
    };
    Ok(AccessListEntry::new(*mac, name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticDirectory {
        devices: Vec<KnownDevice>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeviceDirectory for StaticDirectory {
        async fn known_devices(&self) -> Result<Vec<KnownDevice>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.devices.clone())
        }
    }

    fn directory(devices: serde_json::Value) -> StaticDirectory {
        StaticDirectory {
            devices: serde_json::from_value(devices).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    fn mac() -> MacAddress {
        "AA:BB:CC:DD:EE:FF".parse().unwrap()
    }

    #[tokio::test]
    async fn supplied_name_skips_lookup() {
        let dir = directory(serde_json::json!([]));
        let entry = resolve_entry(&dir, &mac(), Some("laptop")).await.unwrap();
        assert_eq!(entry.host_name.as_deref(), Some("laptop"));
        assert_eq!(dir.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn known_device_name_is_used() {
        let dir = directory(serde_json::json!([
            { "MACAddress": "11:22:33:44:55:66", "ActualName": "tv" },
            { "MACAddress": "aa:bb:cc:dd:ee:ff", "ActualName": "phone" },
        ]));
        let entry = resolve_entry(&dir, &mac(), None).await.unwrap();
        assert_eq!(entry.mac_address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(entry.host_name.as_deref(), Some("phone"));
        assert_eq!(dir.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_device_gets_placeholder() {
        let dir = directory(serde_json::json!([]));
        let entry = resolve_entry(&dir, &mac(), Some("  ")).await.unwrap();
        assert_eq!(
            entry.host_name.as_deref(),
            Some("Unknown device AA:BB:CC:DD:EE:FF")
        );
    }
}
