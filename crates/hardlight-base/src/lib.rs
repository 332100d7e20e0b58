//! Data types shared by the hardlight scanner and the hosts that drive it.
//!
//! Nothing in here touches input text: this crate only describes which literals are open, which
//! tokens a host will accept, and how that state is persisted between scans.

pub mod delimiter;
pub mod modifiers;
pub mod stack;
pub mod token_set;

pub use delimiter::Delimiter;
pub use modifiers::Modifiers;
pub use stack::{DelimiterStack, SerializedStack, StackFull, StateError, MAX_DEPTH, SERIALIZED_CAPACITY};
pub use token_set::{TokenSet, TokenType};
