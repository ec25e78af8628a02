use chrono::{DateTime, TimeZone, Utc};
use ntp_packet::error::ParseError;
use ntp_packet::protocol::{
    EncodeOptions, LeapIndicator, Mode, PACKET_SIZE, PollIntervalPolicy, PrimarySource, ReadBytes,
    ReferenceIdentifier, Request, Response, ShortFormat, Stratum, VersionNumber, WriteBytes,
};
use ntp_packet::timestamp::ntp_epoch;
use std::net::{Ipv4Addr, Ipv6Addr};

// A stratum 1 reply captured from a CDMA-disciplined server.
const CDMA_REPLY: [u8; PACKET_SIZE] = [
    20, 1, 3, 240, 0, 0, 0, 0, 0, 0, 0, 24, 67, 68, 77, 65, 215, 188, 128, 105, 198, 169, 46, 99,
    215, 187, 177, 194, 159, 47, 120, 0, 215, 188, 128, 113, 45, 236, 230, 45, 215, 188, 128, 113,
    46, 35, 158, 108,
];

fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + chrono::TimeDelta::milliseconds(ms as i64)
}

fn make_test_packet(stratum: u8, reference_id: [u8; 4]) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    buf[0] = 0b00_100_100;
    buf[1] = stratum;
    buf[2] = 6;
    buf[3] = (-20i8) as u8;
    buf[12..16].copy_from_slice(&reference_id);
    // 2024-01-01T00:00:00Z in every timestamp field.
    for offset in [16, 24, 32, 40] {
        buf[offset..offset + 4].copy_from_slice(&[0xE9, 0x3C, 0x7F, 0x00]);
    }
    buf
}

#[test]
fn request_to_bytes_v3_client() {
    let request = Request {
        leap_indicator: LeapIndicator::NoAdjustment,
        version: VersionNumber::V3,
        mode: Mode::Client,
        stratum: Stratum::PrimaryServer,
        poll_interval: 6,
        originate_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    };
    let mut expected = [0u8; PACKET_SIZE];
    expected[..3].copy_from_slice(&[0x1B, 0x01, 0x10]);
    expected[24..32].copy_from_slice(&[0xE9, 0x3C, 0x7F, 0x00, 0, 0, 0, 0]);
    assert_eq!(request.to_bytes(), expected);
}

#[test]
fn request_to_bytes_honours_poll_when_asked() {
    let request = Request {
        poll_interval: 10,
        ..Request::client(ntp_epoch())
    };
    let options = EncodeOptions {
        poll_interval: PollIntervalPolicy::FromRequest,
    };
    let bytes = request.to_bytes_with(&options);
    assert_eq!(bytes[0], 0x23);
    assert_eq!(bytes[2], 10);
    assert!(bytes[3..].iter().all(|&b| b == 0));
}

#[test]
fn response_from_cdma_reply() {
    let response = Response::from_bytes(&CDMA_REPLY).unwrap();
    assert_eq!(response.request.leap_indicator, LeapIndicator::NoAdjustment);
    assert_eq!(response.request.version.value(), 2);
    assert_eq!(response.request.mode, Mode::Server);
    assert_eq!(response.request.stratum, Stratum::PrimaryServer);
    assert_eq!(response.request.poll_interval, 3);
    assert_eq!(response.precision, -16);
    assert_eq!(response.root_delay, ShortFormat(0));
    assert_eq!(response.root_dispersion, ShortFormat(24));
    // CDMA is not among the known primary reference codes.
    assert_eq!(response.reference_identifier, ReferenceIdentifier::Empty);
    assert_eq!(
        response.reference_timestamp,
        utc_ms(2014, 9, 11, 20, 11, 21, 776)
    );
    assert_eq!(
        response.request.originate_timestamp,
        utc_ms(2014, 9, 11, 5, 29, 38, 621)
    );
    assert_eq!(
        response.receive_timestamp,
        utc_ms(2014, 9, 11, 20, 11, 29, 179)
    );
    assert_eq!(
        response.transmit_timestamp,
        utc_ms(2014, 9, 11, 20, 11, 29, 180)
    );
}

#[test]
fn response_from_all_zero_buffer() {
    let response = Response::from_bytes(&[0u8; PACKET_SIZE]).unwrap();
    assert_eq!(response.request.leap_indicator, LeapIndicator::NoAdjustment);
    assert_eq!(response.request.version.value(), 0);
    assert_eq!(response.request.mode, Mode::Reserved);
    assert_eq!(response.request.stratum, Stratum::UnspecifiedOrInvalid);
    assert_eq!(response.request.poll_interval, 0);
    assert_eq!(response.precision, 0);
    assert_eq!(response.root_delay, ShortFormat(0));
    assert_eq!(response.root_dispersion, ShortFormat(0));
    assert!(response.reference_identifier.is_empty());
    for time in [
        response.reference_timestamp,
        response.request.originate_timestamp,
        response.receive_timestamp,
        response.transmit_timestamp,
    ] {
        assert_eq!(time, Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap());
    }
}

#[test]
fn response_primary_reference_codes() {
    let gps = Response::from_bytes(&make_test_packet(1, *b"GPS\0")).unwrap();
    assert_eq!(
        gps.reference_identifier,
        ReferenceIdentifier::Primary(PrimarySource::Gps)
    );
    assert_eq!(PrimarySource::Gps.to_string(), "GPS");

    let space_padded = Response::from_bytes(&make_test_packet(1, *b"GPS ")).unwrap();
    assert_eq!(
        space_padded.reference_identifier,
        ReferenceIdentifier::Primary(PrimarySource::Gps)
    );

    let lower = Response::from_bytes(&make_test_packet(1, *b"gps\0")).unwrap();
    assert_eq!(
        lower.reference_identifier,
        ReferenceIdentifier::Primary(PrimarySource::Gps)
    );

    let unknown = Response::from_bytes(&make_test_packet(1, *b"GPSX")).unwrap();
    assert_eq!(unknown.reference_identifier, ReferenceIdentifier::Empty);

    for source in PrimarySource::ALL {
        let response = Response::from_bytes(&make_test_packet(1, source.bytes())).unwrap();
        assert_eq!(response.reference_identifier.primary_source(), Some(source));
    }
}

#[test]
fn response_secondary_reference() {
    let response = Response::from_bytes(&make_test_packet(3, [192, 168, 1, 1])).unwrap();
    assert_eq!(response.request.stratum, Stratum::SecondaryServer);
    let secondary = response.reference_identifier.secondary().unwrap();
    assert_eq!(secondary.address(), Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(secondary.ipv6_digest_base64(), "wKgBAQ==");
    assert!(secondary.matches_ipv4(Ipv4Addr::new(192, 168, 1, 1)));
    assert!(!secondary.matches_ipv4(Ipv4Addr::new(192, 168, 1, 2)));
}

#[test]
fn response_secondary_ipv6_reference() {
    let upstream: Ipv6Addr = "2001:db8::1".parse().unwrap();
    let refid = ReferenceIdentifier::from_ipv6(upstream);
    let response = Response::from_bytes(&make_test_packet(2, refid.as_bytes())).unwrap();
    let secondary = response.reference_identifier.secondary().unwrap();
    assert!(secondary.matches_ipv6(upstream));
    assert!(!secondary.matches_ipv6(Ipv6Addr::LOCALHOST));
}

#[test]
fn response_reference_ignored_outside_server_strata() {
    for stratum in [0u8, 16, 17, 200, 255] {
        let response = Response::from_bytes(&make_test_packet(stratum, *b"RATE")).unwrap();
        assert!(response.reference_identifier.is_empty(), "stratum {}", stratum);
    }
}

#[test]
fn response_rejects_wrong_lengths() {
    let mut long = CDMA_REPLY.to_vec();
    long.extend_from_slice(&[0u8; 20]);
    assert_eq!(
        Response::from_bytes(&long),
        Err(ParseError::MalformedPacket {
            expected: 48,
            actual: 68,
        })
    );
    assert_eq!(
        Response::from_bytes(&CDMA_REPLY[..47]),
        Err(ParseError::MalformedPacket {
            expected: 48,
            actual: 47,
        })
    );
    assert!(Response::from_bytes(&[]).is_err());
}

#[test]
fn malformed_packet_converts_to_io_error() {
    let err: std::io::Error = Response::from_bytes(&[0u8; 12]).unwrap_err().into();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn request_round_trips_through_response() {
    let originate = utc_ms(2024, 6, 30, 23, 59, 59, 250);
    let request = Request {
        leap_indicator: LeapIndicator::LastMinuteHas61Seconds,
        version: VersionNumber::V4,
        mode: Mode::SymmetricActive,
        stratum: Stratum::SecondaryServer,
        poll_interval: PollIntervalPolicy::LEGACY_POLL,
        originate_timestamp: originate,
    };
    let response = Response::from_bytes(&request.to_bytes()).unwrap();
    assert_eq!(response.request.leap_indicator, request.leap_indicator);
    assert_eq!(response.request.version, request.version);
    assert_eq!(response.request.mode, request.mode);
    assert_eq!(response.request.stratum, request.stratum);
    assert_eq!(response.request.poll_interval, request.poll_interval);
    let drift = response.request.originate_timestamp - originate;
    assert!(drift >= chrono::TimeDelta::zero());
    assert!(drift <= chrono::TimeDelta::milliseconds(4));
}

#[test]
fn read_and_write_bytes_traits() {
    let request = Request::client(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let mut wire = Vec::new();
    wire.write_bytes(&request).unwrap();
    assert_eq!(&wire[..], &request.to_bytes()[..]);

    let response = (&CDMA_REPLY[..]).read_bytes::<Response>().unwrap();
    assert_eq!(response, Response::from_bytes(&CDMA_REPLY).unwrap());

    let err = (&CDMA_REPLY[..40]).read_bytes::<Response>().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}
