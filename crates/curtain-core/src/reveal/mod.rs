mod engine;
mod hero;
mod sequencer;

pub use engine::{EnableOutcome, RevealEngine};
pub use hero::{HeroGate, HeroSchedule, HeroStep};
pub use sequencer::{
    hide_delay, BeginOutcome, Completion, CompletionSource, LoadSequencer, LoaderState,
};
