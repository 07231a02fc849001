//! 搜索控件模型：防抖自动补全与选书弹窗

mod autocomplete;
mod book_picker;
mod debounce;

pub use autocomplete::{Autocomplete, SearchScope, SelectionMode};
pub use book_picker::BookPicker;
