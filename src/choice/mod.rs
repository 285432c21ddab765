//! Choice lists: merging "show choices" blocks, hiding entries whose
//! condition is false, and the window the player picks from.

pub mod display;
pub mod filter;
pub mod handle;
pub mod marker;
pub mod merge;
pub mod registry;
pub mod window;

pub use display::{BubbleSpec, ChoiceDisplay, MessageSettings};
pub use filter::{ChoiceEntry, ChoiceFilter};
pub use handle::{ChoiceHandle, ChoiceOutcome};
pub use marker::{Condition, extract_condition};
pub use merge::{
    CancelSlot, CancelType, MergedChoiceSet, RawChoiceBlock, RawEntry, collect_choice_blocks, merge_blocks,
};
pub use registry::PredicateRegistry;
pub use window::{ChoicePhase, ChoiceWindow, choice_window_size};
