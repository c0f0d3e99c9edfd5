use crate::containers::StorageKey;

/// Identifies a decision variable; the index of its domain in the engine's arena.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

impl VariableId {
    pub const fn new(index: u32) -> Self {
        VariableId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(index as u32)
    }
}

#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum VariableType {
    Binary,
    Integer,
    Continuous,
}

impl VariableType {
    /// Whether bounds of variables of this type are rounded to integers.
    pub fn is_integral(self) -> bool {
        !matches!(self, VariableType::Continuous)
    }
}
