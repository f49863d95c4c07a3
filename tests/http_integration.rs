// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP device using wiremock.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use modernforms::command::{CommandSet, FanSettings, LightSettings};
use modernforms::protocol::{HttpClient, HttpConfig, Protocol};
use modernforms::types::{FanDirection, SleepTimer};
use modernforms::{Device, Error, HttpDeviceBuilder, ProtocolError, RetryPolicy, ValueError};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn device_info() -> Value {
    json!({
        "clientId": "MF_000000000000",
        "mac": "AA:BB:CC:DD:EE:FF",
        "lightType": "F6IN-120V-R1-30",
        "fanType": "1818-56",
        "fanMotorType": "DC125X25",
        "productionLotNumber": "",
        "productSku": "",
        "owner": "someone@example.com",
        "federatedIdentity": "us-east-1:f3da237b-c19c-4f61-b387-0e6dde2e470b",
        "deviceName": "Living Room Fan",
        "firmwareVersion": "01.03.0025",
        "mainMcuFirmwareVersion": "01.03.3008",
        "firmwareUrl": ""
    })
}

fn basic_state() -> Value {
    json!({
        "adaptiveLearning": false,
        "awayModeEnabled": false,
        "clientId": "MF_000000000000",
        "decommission": false,
        "factoryReset": false,
        "fanDirection": "forward",
        "fanOn": true,
        "fanSleepTimer": 0,
        "fanSpeed": 3,
        "lightBrightness": 50,
        "lightOn": false,
        "lightSleepTimer": 0,
        "resetRfPairList": false,
        "rfPairModeActive": false,
        "schedule": ""
    })
}

fn breeze_state() -> Value {
    let mut state = basic_state();
    state["wind"] = json!(false);
    state["windSpeed"] = json!(2);
    state
}

/// Answers like the fan firmware: applies the request and returns the full
/// state.
#[derive(Clone)]
struct FanEmulator {
    state: Arc<Mutex<Map<String, Value>>>,
}

impl FanEmulator {
    fn new(state: Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(state.as_object().cloned().unwrap_or_default())),
        }
    }
}

impl Respond for FanEmulator {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().unwrap_or_default();
        let mut state = self.state.lock();
        if let Some(fields) = body.as_object() {
            for (field, value) in fields {
                if !matches!(field.as_str(), "queryStatus" | "reboot") {
                    state.insert(field.clone(), value.clone());
                }
            }
        }
        ResponseTemplate::new(200).set_body_json(Value::Object(state.clone()))
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new()
        .with_initial_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(50))
}

fn builder_for(server: &MockServer) -> HttpDeviceBuilder {
    let address = server.address();
    Device::http(address.ip().to_string())
        .with_port(address.port())
        .with_retry_policy(fast_retry())
}

fn device_for(server: &MockServer) -> Device<HttpClient> {
    builder_for(server).build_without_probe().unwrap()
}

async fn mount_static_data(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/mf"))
        .and(body_json(json!({"queryStaticData": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_info()))
        .mount(server)
        .await;
}

async fn mount_fan(server: &MockServer, state: Value) {
    mount_static_data(server).await;
    Mock::given(method("POST"))
        .and(path("/mf"))
        .respond_with(FanEmulator::new(state))
        .mount(server)
        .await;
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    requests.last().unwrap().body_json().unwrap()
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    fn client_for(server: &MockServer) -> HttpClient {
        let address = server.address();
        HttpConfig::new(address.ip().to_string())
            .with_port(address.port())
            .into_client()
            .unwrap()
    }

    #[tokio::test]
    async fn sends_json_post_with_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/mf"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"queryStatus": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(basic_state()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.send(&CommandSet::new()).await.unwrap();
        assert_eq!(response.json().unwrap()["fanSpeed"], json!(3));

        let requests = server.received_requests().await.unwrap();
        let user_agent = requests[0].headers.get("user-agent").unwrap();
        assert!(user_agent.to_str().unwrap().starts_with("modernforms/"));
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn sends_basic_auth_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/mf"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(basic_state()))
            .expect(1)
            .mount(&server)
            .await;

        let address = server.address();
        let client = HttpConfig::new(address.ip().to_string())
            .with_port(address.port())
            .with_credentials("admin", "secret")
            .into_client()
            .unwrap();

        client.send(&CommandSet::query_status()).await.unwrap();
    }

    #[tokio::test]
    async fn skips_auth_with_empty_password() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let address = server.address();
        let client = HttpConfig::new(address.ip().to_string())
            .with_port(address.port())
            .with_credentials("admin", "")
            .into_client()
            .unwrap();

        client.send(&CommandSet::query_status()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn uses_base_path_and_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/proxy/fan/mf"))
            .and(header("user-agent", "living-room/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(basic_state()))
            .expect(1)
            .mount(&server)
            .await;

        let address = server.address();
        let client = HttpConfig::new(address.ip().to_string())
            .with_port(address.port())
            .with_base_path("/proxy/fan")
            .with_user_agent("living-room/1.0")
            .into_client()
            .unwrap();

        client.send(&CommandSet::query_status()).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_with_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("error"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&CommandSet::query_status())
            .await
            .unwrap_err();

        match err {
            ProtocolError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, json!({"message": "error"}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_with_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"status": "error"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&CommandSet::query_status())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProtocolError::Status { status: 500, ref body } if *body == json!({"status": "error"})
        ));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(basic_state())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let address = server.address();
        let client = HttpConfig::new(address.ip().to_string())
            .with_port(address.port())
            .with_timeout(Duration::from_millis(100))
            .into_client()
            .unwrap();

        let err = client.send(&CommandSet::query_status()).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout { timeout_ms: 100, .. }));
    }
}

// ============================================================================
// Device Tests
// ============================================================================

mod device {
    use super::*;

    #[tokio::test]
    async fn build_fetches_info_and_state() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let (device, snapshot) = builder_for(&server).build().await.unwrap();

        assert_eq!(snapshot.info.device_name, "Living Room Fan");
        assert_eq!(snapshot.info.mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(snapshot.info.firmware_version, "01.03.0025");
        assert!(snapshot.state.fan_on);
        assert_eq!(snapshot.state.fan_speed, 3);
        assert_eq!(snapshot.state.fan_direction, FanDirection::Forward);
        assert!(!snapshot.has_breeze_mode());
        assert_eq!(device.status().unwrap(), snapshot.state);
        assert_eq!(device.info().unwrap(), snapshot.info);
    }

    #[tokio::test]
    async fn accessors_fail_until_first_update() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        assert!(matches!(device.status(), Err(Error::NotInitialized)));
        assert!(matches!(device.info(), Err(Error::NotInitialized)));
        assert!(server.received_requests().await.unwrap().is_empty());

        device.update(false).await.unwrap();
        assert!(device.status().is_ok());
        assert!(device.info().is_ok());
    }

    #[tokio::test]
    async fn partial_response_only_changes_reported_fields() {
        let server = MockServer::start().await;
        mount_static_data(&server).await;

        Mock::given(method("POST"))
            .and(body_json(json!({"lightOn": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lightOn": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!({"queryStatus": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(basic_state()))
            .mount(&server)
            .await;

        let device = device_for(&server);
        let before = device.update(false).await.unwrap().state;

        let after = device.light(&LightSettings::new().on(true)).await.unwrap();

        assert!(after.light_on);
        assert_eq!(after.light_brightness, before.light_brightness);
        assert_eq!(after.fan_speed, before.fan_speed);
        assert_eq!(after.fan_on, before.fan_on);
    }

    #[tokio::test]
    async fn light_settings_are_sent_and_merged() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        let state = device
            .light(&LightSettings::new().on(true).brightness(80))
            .await
            .unwrap();

        assert!(state.light_on);
        assert_eq!(state.light_brightness, 80);
        assert_eq!(
            last_body(&server).await,
            json!({"lightOn": true, "lightBrightness": 80})
        );
    }

    #[tokio::test]
    async fn fan_settings_are_sent_and_merged() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        let state = device
            .fan(
                &FanSettings::new()
                    .on(false)
                    .speed(6)
                    .direction(FanDirection::Reverse),
            )
            .await
            .unwrap();

        assert!(!state.fan_on);
        assert_eq!(state.fan_speed, 6);
        assert_eq!(state.fan_direction, FanDirection::Reverse);
        assert_eq!(
            last_body(&server).await,
            json!({"fanOn": false, "fanSpeed": 6, "fanDirection": "reverse"})
        );
    }

    #[tokio::test]
    async fn relative_sleep_timer_becomes_deadline() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        let before = Utc::now().timestamp();
        let state = device
            .light(&LightSettings::new().sleep(SleepTimer::seconds(120)))
            .await
            .unwrap();
        let after = Utc::now().timestamp();

        let deadline = last_body(&server).await["lightSleepTimer"].as_i64().unwrap();
        assert!((before + 120..=after + 120).contains(&deadline));
        assert_eq!(state.light_sleep_timer, deadline);
    }

    #[tokio::test]
    async fn cancelled_sleep_timer_sends_zero() {
        let server = MockServer::start().await;
        let mut state = basic_state();
        state["fanSleepTimer"] = json!(Utc::now().timestamp() + 600);
        mount_fan(&server, state).await;

        let device = device_for(&server);
        let state = device
            .fan(&FanSettings::new().sleep(SleepTimer::Cancel))
            .await
            .unwrap();

        assert_eq!(state.fan_sleep_timer, 0);
        assert_eq!(last_body(&server).await, json!({"fanSleepTimer": 0}));
    }

    #[tokio::test]
    async fn invalid_settings_send_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(FanEmulator::new(basic_state()))
            .expect(0)
            .mount(&server)
            .await;

        let device = device_for(&server);

        let err = device
            .light(&LightSettings::new().brightness(101))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSettings(ValueError::OutOfRange { name: "brightness", .. })
        ));

        let err = device.fan(&FanSettings::new().speed(0)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let err = device
            .fan(&FanSettings::new().wind(true).wind_speed(4))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let too_late = Utc::now() + chrono::TimeDelta::hours(25);
        let err = device
            .light(&LightSettings::new().sleep(too_late))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSettings(ValueError::InvalidSleepTime(_))
        ));
    }

    #[tokio::test]
    async fn breeze_settings_on_breeze_fan() {
        let server = MockServer::start().await;
        mount_fan(&server, breeze_state()).await;

        let device = device_for(&server);
        let state = device
            .fan(&FanSettings::new().wind(true).wind_speed(3))
            .await
            .unwrap();

        assert!(device.has_breeze_mode().unwrap());
        assert_eq!(state.wind, Some(true));
        assert_eq!(state.wind_speed, 3);
        assert_eq!(
            last_body(&server).await,
            json!({"wind": true, "windSpeed": 3})
        );
    }

    #[tokio::test]
    async fn partial_echo_keeps_breeze_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"lightOn": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lightOn": true})))
            .mount(&server)
            .await;
        mount_fan(&server, breeze_state()).await;

        let device = device_for(&server);
        device.update(false).await.unwrap();

        let state = device.light(&LightSettings::new().on(true)).await.unwrap();
        assert!(state.light_on);
        assert_eq!(state.wind, Some(false));
        assert!(device.has_breeze_mode().unwrap());

        let state = device
            .fan(&FanSettings::new().wind_speed(3))
            .await
            .unwrap();
        assert_eq!(state.wind_speed, 3);
        assert_eq!(last_body(&server).await, json!({"windSpeed": 3}));
    }

    #[tokio::test]
    async fn breeze_settings_rejected_on_plain_fan() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        let err = device
            .fan(&FanSettings::new().wind(true))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidSettings(ValueError::BreezeModeUnsupported)
        ));
        assert!(!device.has_breeze_mode().unwrap());
        // Only the implicit update went out.
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn away_mode_and_adaptive_learning() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);

        let state = device.away(true).await.unwrap();
        assert!(state.away_mode_enabled);
        assert_eq!(
            last_body(&server).await,
            json!({"awayModeEnabled": true, "queryStatus": true})
        );

        let state = device.adaptive_learning(true).await.unwrap();
        assert!(state.adaptive_learning_enabled);
        assert_eq!(
            last_body(&server).await,
            json!({"adaptiveLearning": true, "queryStatus": true})
        );
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("error"))
            .expect(1)
            .mount(&server)
            .await;

        let err = device_for(&server).update(false).await.unwrap_err();

        assert_eq!(err.status_code(), Some(500));
        assert!(err.to_string().contains("error"));
    }

    #[tokio::test]
    async fn timeout_is_retried_three_times() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(device_info())
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(3)
            .mount(&server)
            .await;

        let device = builder_for(&server)
            .with_timeout(Duration::from_millis(100))
            .build_without_probe()
            .unwrap();

        let err = device.update(false).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.is_connection_error());
        assert!(!device.is_initialized());
    }

    #[tokio::test]
    async fn connection_refused_is_retried_then_reported() {
        // Reserve a port, then free it so nothing listens there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let device = Device::http("127.0.0.1")
            .with_port(port)
            .with_retry_policy(fast_retry())
            .build_without_probe()
            .unwrap();

        let err = device.update(false).await.unwrap_err();

        assert!(err.is_connection_error());
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn empty_status_is_retried_then_reported() {
        let server = MockServer::start().await;
        mount_static_data(&server).await;

        Mock::given(method("POST"))
            .and(body_json(json!({"queryStatus": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(3)
            .mount(&server)
            .await;

        let device = device_for(&server);
        let err = device.update(false).await.unwrap_err();

        assert!(matches!(err, Error::EmptyResponse { .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = device_for(&server).update(false).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn full_update_refetches_static_data() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let device = device_for(&server);
        device.update(false).await.unwrap();
        device.update(false).await.unwrap();
        device.update(true).await.unwrap();

        let bodies: Vec<Value> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| request.body_json().unwrap())
            .collect();
        let static_queries = bodies
            .iter()
            .filter(|body| body.get("queryStaticData").is_some())
            .count();
        assert_eq!(bodies.len(), 5);
        assert_eq!(static_queries, 2);
    }

    #[tokio::test]
    async fn reboot_tolerates_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({"reboot": true})))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .expect(1)
            .mount(&server)
            .await;

        let device = builder_for(&server)
            .with_timeout(Duration::from_millis(100))
            .build_without_probe()
            .unwrap();

        device.reboot().await.unwrap();
    }

    #[tokio::test]
    async fn credentials_are_sent_by_device() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(basic_auth("admin", "secret"))
            .and(body_json(json!({"queryStaticData": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(device_info()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(basic_auth("admin", "secret"))
            .respond_with(FanEmulator::new(basic_state()))
            .mount(&server)
            .await;

        let (_device, snapshot) = builder_for(&server)
            .with_credentials("admin", "secret")
            .build()
            .await
            .unwrap();

        assert_eq!(snapshot.info.client_id, "MF_000000000000");
    }

    #[tokio::test]
    async fn shared_session_survives_close() {
        let server = MockServer::start().await;
        mount_fan(&server, basic_state()).await;

        let session = reqwest::Client::new();
        let device = builder_for(&server)
            .with_session(session.clone())
            .build_without_probe()
            .unwrap();

        device.update(false).await.unwrap();
        device.close();
        assert!(device.protocol().has_session());

        // The session can still be used after the device is gone.
        drop(device);
        let response = session
            .post(format!("{}/mf", server.uri()))
            .json(&json!({"queryStatus": true}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
}
