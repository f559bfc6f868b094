use crate::algebra::{lookup, UnknownAlgebra};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// The semantics under which extensions are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
pub enum Semantics {
    /// The conflict-free semantics
    #[strum(serialize = "cf")]
    CF,
    /// The admissible semantics
    #[strum(serialize = "adm")]
    ADM,
    /// The complete semantics
    #[strum(serialize = "co")]
    CO,
    /// The grounded semantics
    #[strum(serialize = "gr")]
    GR,
    /// The preferred semantics
    #[strum(serialize = "pr")]
    PR,
    /// The semi-stable semantics
    #[strum(serialize = "sst")]
    SST,
    /// The ideal semantics
    #[strum(serialize = "id")]
    ID,
    /// The staged semantics
    #[strum(serialize = "stg")]
    STG,
    /// The stable semantics
    #[strum(serialize = "st")]
    ST,
}

impl Semantics {
    /// Returns `true` iff checking a candidate under this semantics requires comparing it with other candidates.
    ///
    /// This is the case for the semantics based on maximality or minimality (grounded, preferred, semi-stable, ideal, staged).
    pub fn is_maximality_based(&self) -> bool {
        matches!(
            self,
            Semantics::GR | Semantics::PR | Semantics::SST | Semantics::ID | Semantics::STG
        )
    }
}

impl Semantics {
    /// Returns the semantics registered with this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownAlgebra> {
        lookup("semantics", name)
    }
}

/// The optimization applied to the costs of the extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
pub enum Optimization {
    /// Every extension respecting the budget is returned.
    #[strum(serialize = "none")]
    None,
    /// Only the extensions with minimal cost are returned.
    #[strum(serialize = "min")]
    Minimize,
    /// Only the extensions with maximal cost are returned.
    #[strum(serialize = "max")]
    Maximize,
}

impl Optimization {
    /// Returns the optimization registered with this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownAlgebra> {
        lookup("optimization", name)
    }
}
