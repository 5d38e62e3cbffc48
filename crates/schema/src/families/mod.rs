//! One module per component family, each implementing [`crate::Schema`] and
//! [`crate::Component`] on its instance type.

pub mod context_badge;
pub mod hud_card;
pub mod progress_ring;
pub mod status_indicator;

pub use context_badge::ContextBadge;
pub use hud_card::{ActionStyle, CardAction, HudCard};
pub use progress_ring::ProgressRing;
pub use status_indicator::{IndicatorSize, IndicatorState, StatusIndicator};
