/// User-facing notices the screen host shows (toast-style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ResultCount(usize),
    NoResults,
    /// The record store could not be reached. Details go to the log only.
    StoreFailure,
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Self::ResultCount(n) => format!("{n} results found"),
            Self::NoResults => "No results found".to_string(),
            Self::StoreFailure => "The card database could not be opened".to_string(),
        }
    }
}

/// What the detail viewer receives: ids to page through and where to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub ids: Vec<i64>,
    pub start: usize,
}

impl DetailRequest {
    pub fn current(&self) -> Option<i64> {
        self.ids.get(self.start).copied()
    }
}

/// Screen-stack navigation requested by the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Leave this screen, returning to the previous one.
    PopBack,
    /// The result list is the root of the flow; end the flow.
    Finish,
    ShowDetail(DetailRequest),
}

/// Events flowing from the result list to the screen host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Notify(Notification),
    Navigate(Navigation),
}
