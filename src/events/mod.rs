//! # Events Module
//!
//! Progress reporting for grouping runs.
//!
//! The grouper emits events through a channel so any front end (CLI
//! progress bar, server logs, tests) can follow along without the core
//! knowing who is listening.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Group(GroupEvent::Merged { target, retired, .. }) = event {
//!             println!("merged {:?} into {}", retired, target);
//!         }
//!     }
//! });
//!
//! grouper.group_with_events(&photos, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
