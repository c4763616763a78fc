//! Control-channel commands end to end: console bytes in, replies out,
//! configuration persisted through the real key layout.

use std::net::Ipv4Addr;

use oscbridge::app::events::AppEvent;
use oscbridge::app::ports::ConfigPort;
use oscbridge::config::NetworkConfig;

use crate::rig::Rig;

#[test]
fn set_ip_then_get_reports_it_and_persists() {
    let mut rig = Rig::new();
    let replies = rig.command("SET_IP 10.0.0.42");
    assert_eq!(replies, vec!["✅ IP updated and saved."]);

    let replies = rig.command("GET");
    assert_eq!(
        replies,
        vec![
            "IP: 10.0.0.42",
            "Subnet: 255.255.255.0",
            "Gateway: 192.168.1.1",
            "In Port: 7001",
            "Out Port: 7000",
        ]
    );

    assert_eq!(rig.store.load().local_ip, Ipv4Addr::new(10, 0, 0, 42));
}

#[test]
fn every_field_survives_reload() {
    let mut rig = Rig::new();
    rig.command("SET_IP 172.16.0.10");
    rig.command("SET_SUBNET 255.255.0.0");
    rig.command("SET_GATEWAY 172.16.0.1");
    rig.command("SET_INPORT 8001");
    rig.command("SET_OUTPORT 8000");

    let reloaded = rig.store.load();
    assert_eq!(
        reloaded,
        NetworkConfig {
            local_ip: Ipv4Addr::new(172, 16, 0, 10),
            subnet_mask: Ipv4Addr::new(255, 255, 0, 0),
            gateway: Ipv4Addr::new(172, 16, 0, 1),
            in_port: 8001,
            out_port: 8000,
        }
    );
    assert_eq!(*rig.service.config(), reloaded);
}

#[test]
fn bad_subnet_is_rejected_without_change() {
    let mut rig = Rig::new();
    let replies = rig.command("SET_SUBNET bad");
    assert_eq!(replies, vec!["❌ Invalid Subnet format."]);
    assert_eq!(
        rig.service.config().subnet_mask,
        Ipv4Addr::new(255, 255, 255, 0)
    );
    assert_eq!(rig.store.saves, 0);
}

#[test]
fn bad_gateway_and_ip_name_their_field() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.command("SET_GATEWAY 1.2.3"),
        vec!["❌ Invalid Gateway format."]
    );
    assert_eq!(rig.command("SET_IP 300.1.1.1"), vec!["❌ Invalid IP format."]);
}

#[test]
fn port_range_is_enforced() {
    let mut rig = Rig::new();
    for bad in ["0", "65536", "-1", "abc", "70000"] {
        let replies = rig.command(&format!("SET_INPORT {bad}"));
        assert_eq!(
            replies,
            vec!["❌ Invalid port. Must be between 1 and 65535."],
            "input {bad}"
        );
    }
    assert_eq!(rig.service.config().in_port, 7001);
    assert_eq!(rig.store.saves, 0);

    assert_eq!(
        rig.command("SET_INPORT 65535"),
        vec!["✅ Input port set to 65535 and saved."]
    );
    assert_eq!(
        rig.command("SET_OUTPORT 1"),
        vec!["✅ Output port set to 1 and saved."]
    );
    assert_eq!(rig.store.load().in_port, 65535);
    assert_eq!(rig.store.load().out_port, 1);
}

#[test]
fn new_out_port_applies_immediately() {
    let mut rig = Rig::new();
    rig.command("SET_OUTPORT 9999");
    rig.udp.push_int("/device/", 1);
    rig.tick();
    assert_eq!(rig.udp.sent.len(), 2);
    assert!(rig.udp.sent.iter().all(|(dest, _)| dest.port() == 9999));
}

#[test]
fn ip_and_mac_report_the_interface() {
    let mut rig = Rig::new();
    assert_eq!(rig.command("IP"), vec!["ETH IP: 192.168.1.99"]);
    assert_eq!(rig.command("MAC"), vec!["ETH MAC: 24:0A:C4:12:34:56"]);

    rig.net.ip = None;
    assert_eq!(rig.command("IP"), vec!["ETH IP: 0.0.0.0"]);
}

#[test]
fn help_lists_commands_and_changes_nothing() {
    let mut rig = Rig::new();
    let replies = rig.command("HELP");
    assert_eq!(replies[0], "Available commands:");
    assert!(replies.iter().any(|l| l.starts_with("SET_INPORT")));
    assert!(replies.iter().any(|l| l.starts_with("MAC")));
    assert_eq!(rig.store.saves, 0);
    assert_eq!(rig.store.key_count(), 0);
}

#[test]
fn unknown_text_is_ignored() {
    let mut rig = Rig::new();
    assert!(rig.command("REBOOT NOW").is_empty());
    assert!(rig.command("set_ip 1.2.3.4").is_empty());
    assert_eq!(rig.store.key_count(), 0);
    assert_eq!(*rig.service.config(), NetworkConfig::default());
}

#[test]
fn get_substring_falls_back_to_config_report() {
    let mut rig = Rig::new();
    let replies = rig.command("PLEASE GET CONFIG");
    assert_eq!(replies.len(), 5);
    assert_eq!(replies[0], "IP: 192.168.1.99");
}

#[test]
fn crlf_and_padding_are_trimmed() {
    let mut rig = Rig::new();
    rig.console.input.extend(b"  SET_INPORT 7100 \r\n");
    rig.settle();
    assert_eq!(
        rig.console.take_lines(),
        vec!["✅ Input port set to 7100 and saved."]
    );
}

#[test]
fn lines_split_across_reads_are_joined() {
    let mut rig = Rig::new();
    rig.console.input.extend(b"SET_GATE");
    rig.tick();
    assert!(rig.console.take_lines().is_empty());
    rig.console.input.extend(b"WAY 192.168.1.254\nIP\n");
    rig.settle();
    assert_eq!(
        rig.console.take_lines(),
        vec!["✅ Gateway updated and saved.", "ETH IP: 192.168.1.99"]
    );
}

#[test]
fn disconnect_discards_partial_line() {
    let mut rig = Rig::new();
    rig.console.input.extend(b"SET_OUTPORT 9");
    rig.tick();
    rig.console.disconnected = true;
    rig.tick();

    rig.console.input.extend(b"000\n");
    rig.settle();
    assert!(rig.console.take_lines().is_empty());
    assert_eq!(rig.service.config().out_port, 7000);
    assert_eq!(rig.store.saves, 0);
}

#[test]
fn disconnect_without_partial_line_is_harmless() {
    let mut rig = Rig::new();
    rig.console.disconnected = true;
    assert_eq!(rig.command("IP"), vec!["ETH IP: 192.168.1.99"]);
}

#[test]
fn save_failure_keeps_change_and_reports() {
    let mut rig = Rig::new();
    rig.store.fail_writes = true;
    let replies = rig.command("SET_OUTPORT 7500");
    assert_eq!(
        replies,
        vec!["❌ Output port updated but not saved: storage: storage full"]
    );
    assert_eq!(rig.service.config().out_port, 7500);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::ConfigSaveFailed { .. })),
        1
    );
}

#[test]
fn echo_repeats_each_line_after_replies() {
    let mut rig = Rig::new();
    rig.service.set_echo(true);
    assert_eq!(rig.command("IP"), vec!["ETH IP: 192.168.1.99", "IP"]);
    assert_eq!(rig.command("nonsense"), vec!["nonsense"]);
}
