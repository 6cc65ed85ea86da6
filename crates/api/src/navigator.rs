use std::sync::{Mutex, PoisonError};

use axum::response::Redirect;
use view::navigation::{Navigator, Route};

/// Turns the navigation a view asks for into an HTTP redirect.
///
/// `back` goes to the page the user came from when it is a local path, and
/// to the front page otherwise.
#[derive(Debug, Default)]
pub struct HttpNavigator {
    previous: Option<String>,
    target: Mutex<Option<String>>,
}

impl HttpNavigator {
    pub fn new(previous: Option<String>) -> Self {
        HttpNavigator {
            previous: previous.filter(|path| is_local_path(path)),
            target: Mutex::new(None),
        }
    }

    pub fn target(&self) -> Option<String> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn redirect(&self) -> Option<Redirect> {
        self.target().map(|target| Redirect::to(&target))
    }

    fn set_target(&self, target: String) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(target);
    }
}

impl Navigator for HttpNavigator {
    fn navigate(&self, route: Route) {
        self.set_target(route.path());
    }

    fn back(&self) {
        let target = self
            .previous
            .clone()
            .unwrap_or_else(|| Route::Home.path());
        self.set_target(target);
    }
}

/// Only same-site paths are followed, never other hosts.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
