//! # Printer Control Commands
//!
//! Fixed-purpose command builders for ESC/POS-style thermal printers such as
//! the Adafruit mini thermal printer (Ada 597).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC d n`, `ESC 7 n1 n2 n3`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! Every builder returns a fresh [`CommandBuffer`](super::CommandBuffer) so
//! callers can concatenate them into one logical unit of work before handing
//! it to the transport.

use super::CommandBuffer;

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// Dot rows covered by one bit-image band, and the line spacing used while
/// printing bands so consecutive bands touch without a gap.
pub const BAND_LINE_SPACING: u8 = 24;

/// Bit-image mode parameter `m` for `ESC * m`: 24-dot double density.
///
/// The printer only keeps a 1:1 aspect ratio at this density, which is why
/// images are sent as 24-row bands.
pub const BIT_IMAGE_24_DOT_DOUBLE_DENSITY: u8 = 33;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on defaults.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ## Example
///
/// ```
/// use boothprint::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> CommandBuffer {
    vec![ESC, b'@']
}

/// # Set Heating Parameters (ESC 7 n1 n2 n3)
///
/// Controls print darkness and speed.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC 7 n1 n2 n3 |
/// | Hex     | 1B 37 n1 n2 n3 |
///
/// ## Parameters
///
/// - `max_dots`: Max heating dots, in units of 8 dots (11 = 88 dots)
/// - `heat_time`: Heating time, in units of 10µs (0x7F = 1.27ms)
/// - `heat_interval`: Heating interval, in units of 10µs (50 = 0.5ms)
///
/// More heating time and fewer simultaneous dots give darker output at the
/// cost of speed. QR codes come out faded at the factory defaults.
///
/// ## Example
///
/// ```
/// use boothprint::protocol::commands;
///
/// assert_eq!(
///     commands::set_density(11, 0x7F, 50),
///     vec![0x1B, 0x37, 11, 0x7F, 50]
/// );
/// ```
#[inline]
pub fn set_density(max_dots: u8, heat_time: u8, heat_interval: u8) -> CommandBuffer {
    vec![ESC, b'7', max_dots, heat_time, heat_interval]
}

/// Configuration block sent once when a printer is opened:
/// initialize followed by the heating parameters.
pub fn configure(max_dots: u8, heat_time: u8, heat_interval: u8) -> CommandBuffer {
    let mut cmd = init();
    cmd.extend(set_density(max_dots, heat_time, heat_interval));
    cmd
}

// ============================================================================
// TEXT AND PAPER FEED COMMANDS
// ============================================================================

/// # Line Feed (LF)
///
/// Prints the line buffer and advances the paper by the current line spacing.
#[inline]
pub fn line_feed() -> CommandBuffer {
    vec![LF]
}

/// # Print and Feed n Lines (ESC d n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn print_and_feed(lines: u8) -> CommandBuffer {
    vec![ESC, b'd', lines]
}

/// Advance the paper by `lines` lines.
///
/// Zero and one both produce a single `LF`; anything larger uses
/// [`print_and_feed`].
///
/// ```
/// use boothprint::protocol::commands;
///
/// assert_eq!(commands::feed(0), vec![0x0A]);
/// assert_eq!(commands::feed(1), vec![0x0A]);
/// assert_eq!(commands::feed(3), vec![0x1B, 0x64, 3]);
/// ```
pub fn feed(lines: u8) -> CommandBuffer {
    if lines <= 1 {
        line_feed()
    } else {
        print_and_feed(lines)
    }
}

/// Raw text bytes followed by one `LF`.
///
/// No escaping, wrapping or transcoding happens here: the bytes go to the
/// printer as-is, so the text must already be something the printer's
/// character set can show.
pub fn text_line(text: &[u8]) -> CommandBuffer {
    let mut cmd = Vec::with_capacity(text.len() + 1);
    cmd.extend_from_slice(text);
    cmd.push(LF);
    cmd
}

// ============================================================================
// BIT IMAGE COMMANDS
// ============================================================================

/// # Set Line Spacing (ESC 3 n)
///
/// Sets line spacing to 24 dots, the height of one bit-image band.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC 3 24 |
/// | Hex     | 1B 33 18 |
#[inline]
pub fn line_spacing_24() -> CommandBuffer {
    vec![ESC, b'3', BAND_LINE_SPACING]
}

/// # Select Bit-Image Mode (ESC * m)
///
/// Must be followed by a little-endian column count and then 3 bytes per
/// column.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC * 33 |
/// | Hex     | 1B 2A 21 |
#[inline]
pub fn select_bit_image_mode() -> CommandBuffer {
    vec![ESC, b'*', BIT_IMAGE_24_DOT_DOUBLE_DENSITY]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use boothprint::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
