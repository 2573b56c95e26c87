mod input_translator;
mod swipe;

pub use input_translator::InputTranslator;
pub use swipe::{classify_swipe, DEFAULT_SWIPE_THRESHOLD};
