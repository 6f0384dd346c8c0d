pub mod data;
pub mod line_results;
pub mod live_pace;
pub mod odds_math;
pub mod pick_parser;
pub mod pick_ranker;

pub use data::*;
pub use line_results::*;
pub use live_pace::*;
pub use odds_math::*;
pub use pick_parser::*;
pub use pick_ranker::*;
