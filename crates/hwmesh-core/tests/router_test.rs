#![allow(clippy::unwrap_used)]
// End-to-end `Router` tests over HTTP using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hwmesh_api::RouterClient;
use hwmesh_core::{
    ActionErrorKind, Feature, FilterAction, FilterMode, MacAddress, Router, RouterAction, Switch,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Router<RouterClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RouterClient::with_client(reqwest::Client::new(), base_url);
    (server, Router::new(client))
}

/// Serve the landing page and scrape its CSRF pair so writes can be sent.
async fn with_csrf(server: &MockServer, router: &Router<RouterClient>) {
    Mock::given(method("GET"))
        .and(path("/html/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<meta name="csrf_param" content="p"><meta name="csrf_token" content="t">"#,
        ))
        .mount(server)
        .await;
    router.transport().refresh_csrf().await.unwrap();
}

async fn mount_features(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/bsp/nfc_switch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nfcSwitch": 1 })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ntwk/WlanGuideBasic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "WifiConfig": [{ "Dot11REnable": true }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}

// ── Features & switches ─────────────────────────────────────────────

#[tokio::test]
async fn test_feature_detection() {
    let (server, router) = setup().await;
    mount_features(&server).await;

    let features = router.available_features().await.unwrap();

    assert_eq!(features, vec![Feature::Nfc, Feature::Wifi80211r]);
    assert!(!router.is_feature_available(Feature::WlanFilter).await.unwrap());
}

#[tokio::test]
async fn test_switch_states() {
    let (server, router) = setup().await;
    mount_features(&server).await;

    assert!(router.switch_state(Switch::Nfc).await.unwrap());
    assert!(router.switch_state(Switch::Wifi80211r).await.unwrap());

    let err = router.switch_state(Switch::WifiTwt).await.unwrap_err();
    assert_eq!(err.action_kind(), Some(ActionErrorKind::Unsupported));
}

#[tokio::test]
async fn test_set_80211r_sends_action() {
    let (server, router) = setup().await;
    mount_features(&server).await;
    with_csrf(&server, &router).await;

    Mock::given(method("POST"))
        .and(path("/api/ntwk/WlanGuideBasic"))
        .and(body_partial_json(json!({
            "data": { "Dot11REnable": false },
            "action": "11rSetting",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(router.set_switch_state(Switch::Wifi80211r, false).await.unwrap());
}

#[tokio::test]
async fn test_set_nfc_uses_integer_flag() {
    let (server, router) = setup().await;
    mount_features(&server).await;
    with_csrf(&server, &router).await;

    Mock::given(method("POST"))
        .and(path("/api/bsp/nfc_switch"))
        .and(body_partial_json(json!({ "data": { "nfcSwitch": 0 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    router.set_switch_state(Switch::Nfc, false).await.unwrap();
}

// ── Actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reboot() {
    let (server, router) = setup().await;
    with_csrf(&server, &router).await;

    Mock::given(method("POST"))
        .and(path("/api/service/reboot.cgi"))
        .and(body_partial_json(json!({ "data": {} })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    router.execute_action(RouterAction::Reboot).await.unwrap();
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_router_info() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system/deviceinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "FriendlyName": "HUAWEI WiFi WS5200",
            "custinfo": { "CustDeviceName": "WS5200" },
            "EmuiVersion": "10.0",
            "UpTime": 3600
        })))
        .mount(&server)
        .await;

    let info = router.router_info().await.unwrap();
    assert_eq!(info.name.as_deref(), Some("HUAWEI WiFi WS5200"));
    assert_eq!(info.model.as_deref(), Some("WS5200"));
    assert_eq!(info.uptime, Some(3600));
}

#[tokio::test]
async fn test_router_info_placeholder_is_unauthorized() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system/deviceinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "EmuiVersion": "-" })))
        .mount(&server)
        .await;

    let err = router.router_info().await.unwrap_err();
    assert!(err.is_unauthorized(), "got: {err:?}");
}

#[tokio::test]
async fn test_wan_connection_info() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ntwk/wandetect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": "Connected",
            "ExternalIPAddress": "198.51.100.10",
            "Uptime": 42
        })))
        .mount(&server)
        .await;

    let wan = router.wan_connection_info().await.unwrap();
    assert!(wan.connected);
    assert_eq!(wan.uptime, 42);
    assert_eq!(wan.address.as_deref(), Some("198.51.100.10"));
}

#[tokio::test]
async fn test_known_devices_and_topology() {
    let (server, router) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system/HostInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "MACAddress": "AA:BB:CC:DD:EE:FF", "HostName": "phone", "Active": true }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/device/topology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "MACAddress": "00:11:22:33:44:55",
            "HiLinkType": "Device",
            "ConnectedDevices": [{ "MACAddress": "AA:BB:CC:DD:EE:FF" }]
        }])))
        .mount(&server)
        .await;

    let devices = router.known_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name(), Some("phone"));

    let topology = router.devices_topology().await.unwrap();
    assert_eq!(topology[0].connected_devices.len(), 1);
}

// ── WLAN filter over HTTP ───────────────────────────────────────────

#[tokio::test]
async fn test_apply_wlan_filter_posts_combined_command() {
    let (server, router) = setup().await;
    with_csrf(&server, &router).await;

    let band = |label: &str| {
        json!({
            "FrequencyBand": label,
            "MACAddressControlEnabled": true,
            "WMACAddresses": [],
            "BMACAddresses": [{ "MACAddress": "AA:BB:CC:DD:EE:FF", "HostName": "phone" }],
            "ID": label,
            "MacFilterPolicy": 1
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([band("2.4GHz"), band("5GHz")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .and(body_partial_json(json!({
            "data": {
                "config2g": {
                    "WMacFilters": [{ "MACAddress": "AA:BB:CC:DD:EE:FF", "HostName": "phone" }],
                    "BMacFilters": [],
                    "ID": "2.4GHz"
                },
                "config5g": {
                    "WMacFilters": [{ "MACAddress": "AA:BB:CC:DD:EE:FF", "HostName": "phone" }],
                    "BMacFilters": [],
                    "FrequencyBand": "5GHz"
                }
            },
            "csrf": { "csrf_param": "p", "csrf_token": "t" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
    let applied = router
        .apply_wlan_filter(FilterMode::Whitelist, FilterAction::Add, &mac, None)
        .await
        .unwrap();
    assert!(applied);
}
