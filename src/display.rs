//! Fixed-width status label for the 8-character display.
//!
//! The controller only reports a [`Status`] tag; this is where it becomes
//! text.  Labels are always exactly [`LABEL_WIDTH`] ASCII bytes, space
//! padded, so the display driver can blit them without measuring.

use core::fmt::Write;

use heapless::String;

use crate::fsm::context::Status;

pub const LABEL_WIDTH: usize = 8;

pub type Label = String<LABEL_WIDTH>;

/// Render `status` as an 8-character label.
///
/// `Counting(n)` shows the dwell count right-aligned in the last two
/// columns with a blank tens digit below ten (`"Count  7"`, `"Count 12"`).
/// Counts above 99 show as `"Count99+"`.
pub fn label(status: Status) -> Label {
    let mut s = Label::new();
    // Every branch writes at most LABEL_WIDTH bytes, so the writes cannot fail.
    let _ = match status {
        Status::Reset => s.write_str("Reset"),
        Status::Off => s.write_str("Off"),
        Status::Counting(n) if n > 99 => s.write_str("Count99+"),
        Status::Counting(n) => write!(s, "Count{n:>3}"),
        Status::On => s.write_str("On"),
        Status::WaterSource => s.write_str("WaterSrc"),
        Status::Alarm => s.write_str("Alarm"),
        Status::Muted => s.write_str("Muted"),
    };
    while s.len() < LABEL_WIDTH {
        let _ = s.push(' ');
    }
    s
}

/// Same label as raw bytes, for byte-oriented display drivers.
pub fn label_bytes(status: Status) -> [u8; LABEL_WIDTH] {
    let mut buf = [b' '; LABEL_WIDTH];
    buf.copy_from_slice(label(status).as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_is_eight_bytes() {
        for status in [
            Status::Reset,
            Status::Off,
            Status::Counting(0),
            Status::Counting(9),
            Status::Counting(42),
            Status::Counting(1000),
            Status::On,
            Status::WaterSource,
            Status::Alarm,
            Status::Muted,
        ] {
            assert_eq!(label(status).len(), LABEL_WIDTH, "{status:?}");
        }
    }

    #[test]
    fn fixed_labels_are_space_padded() {
        assert_eq!(label(Status::Reset).as_str(), "Reset   ");
        assert_eq!(label(Status::Off).as_str(), "Off     ");
        assert_eq!(label(Status::On).as_str(), "On      ");
        assert_eq!(label(Status::WaterSource).as_str(), "WaterSrc");
        assert_eq!(label(Status::Alarm).as_str(), "Alarm   ");
        assert_eq!(label(Status::Muted).as_str(), "Muted   ");
    }

    #[test]
    fn counting_label_blanks_leading_zero() {
        assert_eq!(label(Status::Counting(7)).as_str(), "Count  7");
        assert_eq!(label(Status::Counting(12)).as_str(), "Count 12");
        assert_eq!(label(Status::Counting(123)).as_str(), "Count99+");
    }

    #[test]
    fn label_bytes_matches_label() {
        assert_eq!(&label_bytes(Status::Alarm), b"Alarm   ");
    }
}
