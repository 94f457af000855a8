use crate::controller::MovieListEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    Select,
    Resize(u16),

    // Search box
    FocusSearch(bool),
    SuggestionUp,
    SuggestionDown,

    // Forwarded to the list controller
    List(MovieListEvent),

    // Detail screen
    OpenInBrowser,
    YankUrl,

    None,
}
