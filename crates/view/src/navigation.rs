use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use db::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Post(DbId),
    SignIn,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::Post(id) => format!("/post/{}", id),
            Route::SignIn => String::from("/auth/sign_in"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where views send the user next.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);

    fn back(&self);

    fn scroll_to_top(&self) {}
}

/// In-memory navigation history.
#[derive(Debug, Default)]
pub struct History {
    inner: Mutex<HistoryState>,
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<Route>,
    navigations: usize,
    scrolls: usize,
}

impl History {
    pub fn starting_at(route: Route) -> Self {
        History {
            inner: Mutex::new(HistoryState {
                entries: vec![route],
                ..Default::default()
            }),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.state(|state| state.entries.last().cloned())
    }

    /// Number of `navigate` calls so far.
    pub fn navigations(&self) -> usize {
        self.state(|state| state.navigations)
    }

    pub fn scrolls(&self) -> usize {
        self.state(|state| state.scrolls)
    }

    fn state<R>(&self, f: impl FnOnce(&mut HistoryState) -> R) -> R {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        log::debug!("navigating to {}", route);
        self.state(|state| {
            state.entries.push(route);
            state.navigations += 1;
        });
    }

    fn back(&self) {
        self.state(|state| {
            if state.entries.len() > 1 {
                state.entries.pop();
            }
        });
    }

    fn scroll_to_top(&self) {
        self.state(|state| state.scrolls += 1);
    }
}

#[cfg(test)]
mod tests {
    use db::types::DbId;

    use super::{History, Navigator, Route};

    #[test]
    fn back_returns_to_previous_route() {
        let history = History::starting_at(Route::Home);
        history.navigate(Route::Post(DbId::new(2)));
        assert_eq!(history.current(), Some(Route::Post(DbId::new(2))));
        assert_eq!(Route::Post(DbId::new(2)).path(), "/post/2");

        history.back();
        assert_eq!(history.current(), Some(Route::Home));
        history.back();
        assert_eq!(history.current(), Some(Route::Home));
        assert_eq!(history.navigations(), 1);
    }
}
