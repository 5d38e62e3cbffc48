//! Shared vocabulary for generated UI components: families, placement, styling
//! enums, and the text/number helpers every schema builds on.

/// Component family tags and per-family policy constants.
pub mod family;
/// Numeric coercion helpers (rounding, clamping, NaN handling).
pub mod number;
/// Nine-slot screen placement.
pub mod position;
/// Visual variant and icon enums.
pub mod style;
/// Grapheme-aware length and truncation.
pub mod text;

pub use family::{AdmissionPolicy, Family};
pub use number::{clamp_f64, clamp_int};
pub use position::Position;
pub use style::{Icon, Variant};
pub use text::{grapheme_len, truncate_graphemes};
