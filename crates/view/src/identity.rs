/// Who is looking at the view, as reported by the authentication layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    email: Option<String>,
}

impl Identity {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Identity {
            email: Some(email.into()),
        }
    }

    pub fn anonymous() -> Self {
        Identity { email: None }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
