use crate::api::FilterKind;
use crate::screen::ViewToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchRecords { token: ViewToken, kind: FilterKind, value: String },
    FetchDetail { token: ViewToken, name: String },
    Quit,
}
