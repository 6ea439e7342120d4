//! # LDAP Directory Connection
//!
//! LDAP/Active Directory backend for the typed directory object layer.
//!
//! ## Features
//!
//! - LDAP v3 protocol support
//! - SSL/TLS and STARTTLS
//! - One cached, multiplexed session per connection
//! - Binary attribute handling for `objectSid` and `objectGUID`
//!
//! ## Example
//!
//! ```ignore
//! use adobjects_ldap::{LdapConfig, LdapDirectory};
//!
//! let config = LdapConfig::for_domain("corp.example.com", "admin@corp.example.com")
//!     .with_password("secret");
//!
//! let directory = LdapDirectory::new(config)?;
//! directory.test_connection().await?;
//! ```

pub mod config;
pub mod connector;

// Re-exports
pub use config::LdapConfig;
pub use connector::LdapDirectory;
