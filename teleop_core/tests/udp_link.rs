//! End-to-end checks over a loopback socket: the bytes that arrive at the
//! actuator side are exactly the formatted command, one datagram per frame.

use std::net::{SocketAddrV4, UdpSocket};
use std::time::Duration;

use teleop_core::{
    ActionState, HandFrame, JointSample, Pipeline, Point, UdpTransmitter,
};

fn receiver() -> (UdpSocket, SocketAddrV4) {
    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let addr = match sock.local_addr().unwrap() {
        std::net::SocketAddr::V4(a) => a,
        other => panic!("expected IPv4, got {}", other),
    };
    (sock, addr)
}

fn recv_text(sock: &UdpSocket) -> String {
    let mut buf = [0u8; 64];
    let n = sock.recv(&mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

fn link_to(addr: SocketAddrV4) -> Pipeline<UdpTransmitter> {
    let tx = UdpTransmitter::open("127.0.0.1:0".parse().unwrap(), addr).unwrap();
    Pipeline::new(tx)
}

#[test]
fn centre_of_pad_sends_stop() {
    let (rx, addr) = receiver();
    let mut p = link_to(addr);
    p.cycle(&HandFrame {
        left:  JointSample::lost(),
        right: JointSample::tracked(Point::new(480.0, 240.0)),
    });
    assert_eq!(recv_text(&rx), "0.00 0.00");
}

#[test]
fn pad_edge_sends_full_scale() {
    let (rx, addr) = receiver();
    let mut p = link_to(addr);
    p.cycle(&HandFrame {
        left:  JointSample::lost(),
        right: JointSample::tracked(Point::new(640.0, 240.0)),
    });
    assert_eq!(recv_text(&rx), "1.00 0.00");
}

#[test]
fn held_value_is_resent_every_frame() {
    let (rx, addr) = receiver();
    let mut p = link_to(addr);

    // frame 1: tracked in pad, up and to the left
    p.cycle(&HandFrame {
        left:  JointSample::lost(),
        right: JointSample::tracked(Point::new(400.0, 180.0)),
    });
    let first = recv_text(&rx);
    assert_eq!(first, "-0.71 0.71");

    // frame 2: lost
    p.cycle(&HandFrame::untracked());
    // frame 3: tracked but off pad
    p.cycle(&HandFrame {
        left:  JointSample::lost(),
        right: JointSample::tracked(Point::new(100.0, 450.0)),
    });

    assert_eq!(recv_text(&rx), first);
    assert_eq!(recv_text(&rx), first);
    assert_eq!(p.stats().sent, 3);
}

#[test]
fn action_does_not_leak_into_payload() {
    let (rx, addr) = receiver();
    let mut p = link_to(addr);
    p.cycle(&HandFrame {
        left:  JointSample::tracked(Point::new(250.0, 150.0)),
        right: JointSample::lost(),
    });
    assert_eq!(p.state().action_state(), ActionState::Fire);
    assert_eq!(recv_text(&rx), "0.00 0.00");
}

#[test]
fn transmitter_reports_its_endpoint() {
    let (_rx, addr) = receiver();
    let tx = UdpTransmitter::open("127.0.0.1:0".parse().unwrap(), addr).unwrap();
    assert_eq!(tx.endpoint(), addr);
    assert!(tx.local_addr().unwrap().port() != 0);
}
