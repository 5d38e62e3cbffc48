use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Nine-slot screen placement shared by every component family.
///
/// Declaration order doubles as the deterministic order in which position
/// groups are presented to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
	TopLeft,
	TopCenter,
	TopRight,
	MiddleLeft,
	/// Screen center. Only some families may be placed here.
	Center,
	MiddleRight,
	BottomLeft,
	BottomCenter,
	BottomRight,
}

impl Position {
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}
