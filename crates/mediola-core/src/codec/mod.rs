// ── Per-family codec ──
//
// Command encoding and state decoding, both implemented as inherent
// methods on `DeviceFamily` so dispatch is a single `match`.

mod decode;
mod encode;

pub use decode::elero;
pub use encode::position_hex;
