//! Staged loading sequence
//!
//! A progress bar, a rotating highlight and a status message run on their
//! own timers, all reading the same [`LoadProgress`](progress::LoadProgress).
//! When progress reaches 100 they stop and the completion coordinator
//! removes the overlay and brings the page in.

pub mod completion;
pub mod highlight;
pub mod messages;
pub mod progress;
pub mod sequence;

pub use completion::{CompletionCoordinator, CompletionStage, CompletionTask};
pub use highlight::{HighlightRotator, RotatorStep};
pub use messages::{MessageSequencer, SequencerStep};
pub use progress::{Increment, LoadProgress, ProgressReader, ProgressSimulator, ProgressStep};
pub use sequence::{LoaderEvent, LoaderSequence, LoaderTask};
