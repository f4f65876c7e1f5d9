#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/refcell/keel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod client;
pub use client::{DacClient, HttpDacClient, verify_commitment};

mod config;
pub use config::DacConfig;

mod error;
pub use error::{DacConfigError, DacError};
