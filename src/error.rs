use core::fmt::{self, Display, Formatter};

/// Construction-time failures.
///
/// Misuse of a mounted fragment (mounting twice, patching before mounting, patching across shapes)
/// is a bug in the calling code and panics instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A loop source was neither a list nor a map.
	InvalidCollection { found: &'static str },
	/// Slot indices of a [`Shape`](`crate::template::Shape`) must each be unique and contiguous from 0.
	SlotIndex { kind: SlotKind, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
	Data,
	Child,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Error::InvalidCollection { found } => write!(f, "Invalid loop expression: expected a list or map but found {}", found),
			Error::SlotIndex { kind, index } => {
				let kind = match kind {
					SlotKind::Data => "data",
					SlotKind::Child => "child",
				};
				write!(f, "Duplicate or non-contiguous {} slot index {}", kind, index)
			}
		}
	}
}

impl std::error::Error for Error {}
