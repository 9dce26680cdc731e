//! Plaintext plausibility sniffing
//!
//! Decides whether a decryption attempt produced genuine plaintext or noise.
//! The producing application serializes its artifacts as protobuf, so the
//! first byte must parse as a plausible field tag; a null/printable count
//! over the leading window then filters out the remaining gibberish.
//!
//! This is a heuristic, not a proof. Both false positives (noise with a
//! plausible tag) and false negatives (binary payloads with no printable
//! bytes) can occur. The thresholds are observable behavior; do not tune
//! them.

use std::fmt;

/// Highest wire-type code a protobuf field tag can carry
const MAX_WIRE_TYPE: u8 = 5;

/// Number of leading bytes examined by the null/printable heuristic
const SNIFF_WINDOW: usize = 100;

/// Outcome of sniffing one decryption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

/// Why a decryption attempt was judged to be noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Zero-length output
    Empty,
    /// First byte's low 3 bits exceed the valid wire-type range
    WireType(u8),
    /// First byte's field number is zero, never valid in protobuf
    FieldNumber,
    /// Leading window is mostly nulls with no printable bytes at all
    RandomBytes,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty data"),
            Self::WireType(wire_type) => {
                write!(f, "invalid protobuf wire type: {wire_type}")
            }
            Self::FieldNumber => f.write_str("invalid protobuf field number: 0"),
            Self::RandomBytes => f.write_str("decrypted data appears to be random bytes"),
        }
    }
}

/// Classify a decryption attempt's output.
///
/// Checks run in a fixed order: emptiness, then the first-byte field tag
/// (wire type ≤ 5, field number ≠ 0), then the null/printable window. An
/// all-zero buffer is therefore rejected for its field number, not by the
/// window heuristic.
pub fn validate(data: &[u8]) -> Verdict {
    let Some(&first) = data.first() else {
        return Verdict::Rejected(RejectReason::Empty);
    };

    let wire_type = first & 0x07;
    let field_number = first >> 3;
    if wire_type > MAX_WIRE_TYPE {
        return Verdict::Rejected(RejectReason::WireType(wire_type));
    }
    if field_number == 0 {
        return Verdict::Rejected(RejectReason::FieldNumber);
    }

    let window = &data[..data.len().min(SNIFF_WINDOW)];
    let null_count = window.iter().filter(|&&b| b == 0).count();
    let printable_count = window.iter().filter(|&&b| (0x20..=0x7e).contains(&b)).count();
    if null_count > window.len() / 2 && printable_count == 0 {
        return Verdict::Rejected(RejectReason::RandomBytes);
    }

    Verdict::Accepted
}
