//! # ReplyClaw Surface
//!
//! The automation-surface boundary: the `Surface` trait the dispatcher
//! drives pages through, a WebDriver-backed implementation, the persisted
//! authentication snapshot, and its one-time capture flow.

pub mod auth;
pub mod bootstrap;
pub mod lookup;
pub mod surface;
pub mod webdriver;

pub use auth::{AuthSnapshot, OriginState, SessionCookie, StorageEntry};
pub use lookup::{Control, Lookup};
pub use surface::Surface;
pub use webdriver::WebDriverSurface;
