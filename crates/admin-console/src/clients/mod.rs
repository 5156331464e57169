//! Typed clients, one per console resource, built on
//! [`ResourceClient`](sync_framework::ResourceClient).

pub mod class_client;
pub mod enterprise_client;
pub mod package_client;
pub mod promo_code_client;
pub mod report_client;
pub mod role_client;

pub use class_client::*;
pub use enterprise_client::*;
pub use package_client::*;
pub use promo_code_client::*;
pub use report_client::*;
pub use role_client::*;
