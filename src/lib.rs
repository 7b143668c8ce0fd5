pub mod choice;
pub mod choice_list;
pub mod color;
pub mod diacritics;
pub mod fallback;
pub mod select;
pub mod utils;

pub use choice::{Choice, ChoiceSummary};
pub use choice_list::{ChoiceKeys, ChoiceList, FilteredView};
pub use fallback::{
    resolve_fallback, FallbackRequest, FallbackResolution, FallbackResolver, JsonFileResolver,
};
pub use select::{Select, SelectConfig, SelectEvent, SelectKey};
