//! NMEA sentence assembly and GGA field extraction.
//!
//! The line assembler is fed one byte at a time from whatever reception
//! context the platform provides (UART interrupt, serial task) and must
//! never block its producer. Completed sentences carrying the GGA frame
//! identifier are parsed into a [`GpsFix`]; everything else is dropped.

use serde::{Deserialize, Serialize};

/// Maximum accepted sentence length; longer input is truncated.
pub const SENTENCE_MAX: usize = 128;
/// Maximum number of comma-separated fields per sentence.
pub const MAX_FIELDS: usize = 16;
/// Substring in the leading token that marks a position sentence
/// (matches both `$GPGGA` and `$GNGGA` talkers).
pub const FRAME_ID: &str = "GGA";

const SENTENCE_START: u8 = b'$';
const SENTENCE_END: u8 = b'\n';

const UTC_MAX: usize = 16;

#[cfg(feature = "std")]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceError {
    #[error("Frame identifier missing")]
    NotGga,
    #[error("Missing required field")]
    MissingField,
    #[error("Encoding error")]
    Encoding,
}

#[cfg(not(feature = "std"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceError {
    NotGga,
    MissingField,
    Encoding,
}

/// Position record parsed from one GGA sentence.
///
/// Latitude and longitude are decimal degrees, altitude is meters above
/// mean sea level. The UTC time is kept as the raw `hhmmss[.ss]` text;
/// the position worker decides how to pack it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub sats: u32,
    pub hdop: f64,
    pub utc: heapless::String<UTC_MAX>,
}

/// Converts an NMEA `[D]DDMM.MMMM` coordinate plus hemisphere letter to
/// decimal degrees.
///
/// The digits are accumulated as a plain decimal number, then split into
/// whole degrees and minutes. Inputs shorter than 4 characters yield 0.0
/// rather than an error, matching what a receiver emits before it has a
/// fix (empty fields).
pub fn nmea_to_degrees(nmea: &str, dir: char) -> f64 {
    if nmea.len() < 4 {
        return 0.0;
    }

    let mut value = 0.0f64;
    let mut decimal = 0.0f64;
    let mut seen_dot = false;
    let mut divisor = 10.0f64;

    for c in nmea.chars() {
        if c.is_ascii_digit() {
            let digit = (c as u8 - b'0') as f64;
            if !seen_dot {
                value = value * 10.0 + digit;
            } else {
                decimal += digit / divisor;
                divisor *= 10.0;
            }
        } else if c == '.' {
            seen_dot = true;
        } else {
            break;
        }
    }

    value += decimal;

    let degrees = (value / 100.0) as i32;
    let minutes = value - (degrees as f64 * 100.0);
    let mut result = degrees as f64 + minutes / 60.0;

    if dir == 'S' || dir == 'W' {
        result = -result;
    }
    result
}

fn field<'a>(fields: &[&'a str], idx: usize) -> &'a str {
    fields.get(idx).copied().unwrap_or("")
}

/// Parses a single GGA sentence.
///
/// Expected field layout:
/// ```text
///  0 = $GPGGA or $GNGGA
///  1 = UTC time (hhmmss.ss)
///  2 = Latitude (DDMM.MMMM)
///  3 = N/S
///  4 = Longitude (DDDMM.MMMM)
///  5 = E/W
///  6 = Fix quality
///  7 = Number of satellites
///  8 = HDOP
///  9 = Altitude (meters)
/// ```
/// The identifier, latitude, longitude, and both hemisphere letters are
/// required; the remaining fields default to 0 / empty when absent.
pub fn parse_gga(line: &str) -> Result<GpsFix, SentenceError> {
    let mut fields: heapless::Vec<&str, MAX_FIELDS> = heapless::Vec::new();
    for part in line.splitn(MAX_FIELDS, ',') {
        if fields.push(part).is_err() {
            break;
        }
    }

    if !field(&fields, 0).contains(FRAME_ID) {
        return Err(SentenceError::NotGga);
    }

    let lat_str = field(&fields, 2);
    let lon_str = field(&fields, 4);
    let lat_hem = field(&fields, 3).chars().next();
    let lon_hem = field(&fields, 5).chars().next();

    let (lat_hem, lon_hem) = match (lat_hem, lon_hem) {
        (Some(lat_hem), Some(lon_hem)) if !lat_str.is_empty() && !lon_str.is_empty() => {
            (lat_hem, lon_hem)
        }
        _ => return Err(SentenceError::MissingField),
    };

    let mut utc = heapless::String::new();
    for c in field(&fields, 1).chars() {
        if utc.push(c).is_err() {
            break;
        }
    }

    Ok(GpsFix {
        lat: nmea_to_degrees(lat_str, lat_hem),
        lon: nmea_to_degrees(lon_str, lon_hem),
        alt: field(&fields, 9).parse().unwrap_or(0.0),
        sats: field(&fields, 7).parse().unwrap_or(0),
        hdop: field(&fields, 8).parse().unwrap_or(0.0),
        utc,
    })
}

/// Reassembles sentences from a byte-at-a-time serial stream.
///
/// A `$` resets the buffer and starts a new sentence; a line feed
/// terminates the current one. Bytes past [`SENTENCE_MAX`] are dropped,
/// truncating the sentence rather than rejecting it. The assembler does
/// no waiting of any kind so it is safe to drive from the lowest-latency
/// reception context available.
#[derive(Debug, Default)]
pub struct LineAssembler {
    line: heapless::Vec<u8, SENTENCE_MAX>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            line: heapless::Vec::new(),
        }
    }

    /// Feeds one received byte. Returns a fix when the byte completed a
    /// sentence that carried the frame identifier and parsed cleanly.
    pub fn push_byte(&mut self, byte: u8) -> Option<GpsFix> {
        if byte == SENTENCE_START {
            self.line.clear();
        }
        // a full buffer drops the byte
        let _ = self.line.push(byte);

        if byte != SENTENCE_END {
            return None;
        }

        let fix = match core::str::from_utf8(&self.line) {
            Ok(line) if Self::leading_token_is_position(line) => match parse_gga(line) {
                Ok(fix) => Some(fix),
                Err(e) => {
                    log::debug!("discarding unparseable sentence: {e:?}");
                    None
                }
            },
            _ => None,
        };
        self.line.clear();
        fix
    }

    fn leading_token_is_position(line: &str) -> bool {
        line.split(',').next().unwrap_or("").contains(FRAME_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,123456.00,3542.5797,N,13948.6476,E,1,08,0.9,43.5,M,39.5,M,,*47\r\n";

    fn close(a: f64, b: f64) -> bool {
        let diff = if a > b { a - b } else { b - a };
        diff < 1e-5
    }

    #[test]
    fn converts_nmea_latitude_to_degrees() {
        // 35 degrees, 42.5797 minutes
        let deg = nmea_to_degrees("3542.5797", 'N');
        assert!(close(deg, 35.709662), "got {deg}");
    }

    #[test]
    fn hemisphere_sets_sign() {
        assert!(nmea_to_degrees("3542.5797", 'S') < 0.0);
        assert!(nmea_to_degrees("13948.6476", 'W') < 0.0);
        assert!(nmea_to_degrees("13948.6476", 'E') > 0.0);

        let lon = nmea_to_degrees("17959.9999", 'W');
        assert!((-180.0..=180.0).contains(&lon));
    }

    #[test]
    fn short_input_yields_zero() {
        assert_eq!(nmea_to_degrees("", 'N'), 0.0);
        assert_eq!(nmea_to_degrees("123", 'N'), 0.0);
    }

    #[test]
    fn parses_full_gga_sentence() {
        let fix = parse_gga(GGA).expect("sentence should parse");
        assert!(close(fix.lat, 35.709662));
        assert!(close(fix.lon, 139.810793));
        assert_eq!(fix.sats, 8);
        assert!(close(fix.alt, 43.5));
        assert!(close(fix.hdop, 0.9));
        assert_eq!(fix.utc.as_str(), "123456.00");
    }

    #[test]
    fn rejects_sentence_without_frame_identifier() {
        let line = "$GPRMC,123456.00,A,3542.5797,N,13948.6476,E,0.0,0.0,010124,,,A*6A";
        assert_eq!(parse_gga(line), Err(SentenceError::NotGga));
    }

    #[test]
    fn rejects_sentence_missing_coordinates() {
        assert_eq!(
            parse_gga("$GPGGA,123456.00,,N,13948.6476,E,1,08,0.9,43.5,M,,M,,*47"),
            Err(SentenceError::MissingField)
        );
        assert_eq!(
            parse_gga("$GPGGA,123456.00,3542.5797,,13948.6476,E,1,08,0.9,43.5,M,,M,,*47"),
            Err(SentenceError::MissingField)
        );
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let fix = parse_gga("$GNGGA,,3542.5797,N,13948.6476,E,,,,").expect("should parse");
        assert_eq!(fix.sats, 0);
        assert_eq!(fix.alt, 0.0);
        assert_eq!(fix.hdop, 0.0);
        assert!(fix.utc.is_empty());
    }

    #[test]
    fn assembler_produces_fix_from_byte_stream() {
        let mut assembler = LineAssembler::new();
        let mut fix = None;
        for byte in GGA.bytes() {
            if let Some(f) = assembler.push_byte(byte) {
                fix = Some(f);
            }
        }
        let fix = fix.expect("stream should yield a fix");
        assert_eq!(fix.sats, 8);
    }

    #[test]
    fn start_marker_resets_partial_line() {
        let mut assembler = LineAssembler::new();
        let fix = "garbage,with,no,line,feed"
            .bytes()
            .chain(GGA.bytes())
            .find_map(|b| assembler.push_byte(b))
            .expect("fix after reset");
        assert!(close(fix.lat, 35.709662));
    }

    #[test]
    fn non_position_sentences_are_dropped() {
        let mut assembler = LineAssembler::new();
        let fix = "$GPRMC,123456.00,A,3542.5797,N,13948.6476,E,0.0,0.0,,,,A*6A\r\n"
            .bytes()
            .find_map(|b| assembler.push_byte(b));
        assert!(fix.is_none());
    }

    #[test]
    fn overlong_line_is_truncated_not_fatal() {
        let mut assembler = LineAssembler::new();
        for byte in "$GPGGA,".bytes() {
            assert!(assembler.push_byte(byte).is_none());
        }
        // run the buffer well past capacity, then terminate
        for _ in 0..300 {
            assert!(assembler.push_byte(b'9').is_none());
        }
        assert!(assembler.push_byte(b'\n').is_none());

        // the assembler still works afterwards
        let fix = GGA.bytes().find_map(|b| assembler.push_byte(b));
        assert!(fix.is_some());
    }
}
