//! External service integrations.

pub mod gcis_client {
    pub use crate::gcis_client::*;
}

pub mod endpoints {
    pub use crate::endpoints::*;
}
