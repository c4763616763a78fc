//! Inbound path over a real loopback UDP socket.

#![cfg(not(target_os = "espidf"))]

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::thread;
use std::time::Duration;

use oscbridge::adapters::udp::UdpOscSocket;
use oscbridge::app::events::AppEvent;
use oscbridge::app::ports::DatagramPort;
use oscbridge::app::service::BridgeService;
use oscbridge::app::trigger::LatchState;
use oscbridge::config::NetworkConfig;
use oscbridge::osc::{self, OscMessage};

use crate::mock_hw::LogSink;

fn send_int(tx: &mut UdpOscSocket, port: u16, address: &str, value: i32) {
    let msg = OscMessage::with_int(address, value).unwrap();
    let mut buf = [0u8; 64];
    let n = osc::encode(&msg, &mut buf).unwrap();
    tx.send_to(&buf[..n], SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
        .unwrap();
}

/// Poll until one datagram has been handled or the deadline passes.
fn poll_until_event(service: &mut BridgeService, rx: &mut UdpOscSocket, sink: &mut LogSink) {
    let before = sink.events.len();
    for _ in 0..100 {
        service.poll_osc(rx, sink);
        if sink.events.len() > before {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("no datagram handled within 500 ms");
}

#[test]
fn out_of_range_value_arrives_and_is_dropped() {
    let mut rx = UdpOscSocket::bind(0).unwrap();
    let port = rx.local_addr().unwrap().port();
    let mut tx = UdpOscSocket::bind(0).unwrap();
    let mut service = BridgeService::new(NetworkConfig::default());
    let mut sink = LogSink::new();

    send_int(&mut tx, port, "/device/", 42);
    poll_until_event(&mut service, &mut rx, &mut sink);

    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::TriggerOutOfRange { value: 42 })
    ));
    assert_eq!(service.trigger_state(), LatchState::Idle);
}

#[test]
fn unmatched_address_reports_sender() {
    let mut rx = UdpOscSocket::bind(0).unwrap();
    let port = rx.local_addr().unwrap().port();
    let mut tx = UdpOscSocket::bind(0).unwrap();
    let tx_port = tx.local_addr().unwrap().port();
    let mut service = BridgeService::new(NetworkConfig::default());
    let mut sink = LogSink::new();

    send_int(&mut tx, port, "/column/1/connect", 1);
    poll_until_event(&mut service, &mut rx, &mut sink);

    match sink.events.last() {
        Some(AppEvent::UnmatchedAddress { address, from }) => {
            assert_eq!(address.as_str(), "/column/1/connect");
            assert_eq!(*from, SocketAddr::from((Ipv4Addr::LOCALHOST, tx_port)));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn truncated_datagram_is_malformed() {
    let mut rx = UdpOscSocket::bind(0).unwrap();
    let port = rx.local_addr().unwrap().port();
    let mut tx = UdpOscSocket::bind(0).unwrap();
    let mut service = BridgeService::new(NetworkConfig::default());
    let mut sink = LogSink::new();

    tx.send_to(b"/dev", SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
        .unwrap();
    poll_until_event(&mut service, &mut rx, &mut sink);

    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::MalformedPacket { .. })
    ));
}
