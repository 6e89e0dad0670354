#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(docsrs, feature(doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]

pub mod buffer;
mod debug;
pub mod edid;
pub mod engine;
pub mod format;
pub mod profile;
pub mod state;
pub mod status;
pub mod transport;
pub mod wire;

pub use engine::Engine;
pub use profile::{Hooks, Profile};
pub use status::Status;
