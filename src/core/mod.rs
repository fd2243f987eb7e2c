// Domain-layer modules: decision logic with no network access
pub mod category {
    pub use crate::category::*;
}

pub mod selection {
    pub use crate::selection::*;
}

pub mod normalize {
    pub use crate::normalize::*;
}

pub mod models {
    pub use crate::models::*;
}
