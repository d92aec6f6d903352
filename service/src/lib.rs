pub mod controller;
pub mod remote;

pub mod prelude {
    #[rustfmt::skip]
    pub use super::{
        controller::{Controller, RemoteSettings},
        remote::{ListingError, ScreenListing},
    };
}
