//! Common test utilities for storyweaver-gateway
//!
//! - Request, character and configuration fixtures
//! - A scripted [`remote::ScriptedRemote`] standing in for the generative API
//! - Custom assertions
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, remote::ScriptedRemote};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let remote = ScriptedRemote::always(fixtures::png_payload());
//!     let gateway = fixtures::GatewayFixture::new(remote.clone()).build().await;
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod remote;

// Re-export commonly used items
pub use fixtures::{CharacterFactory, GatewayFixture};
pub use remote::ScriptedRemote;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
