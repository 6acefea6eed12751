use std::fmt;

use snooze_domain::CurrentUser;

/// A link in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Login,
    Submit,
    Favorites,
    MyStories,
    Logout,
}

impl NavAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login/signup",
            Self::Submit => "submit",
            Self::Favorites => "favorites",
            Self::MyStories => "my stories",
            Self::Logout => "logout",
        }
    }
}

/// What the navigation bar shows for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Display name of the logged-in user
    pub welcome: Option<String>,
    pub actions: Vec<NavAction>,
}

impl Navigation {
    pub fn for_user(current: &CurrentUser) -> Self {
        match current.user() {
            Some(user) => Self {
                welcome: Some(user.name.as_str().to_string()),
                actions: vec![
                    NavAction::Submit,
                    NavAction::Favorites,
                    NavAction::MyStories,
                    NavAction::Logout,
                ],
            },
            None => Self {
                welcome: None,
                actions: vec![NavAction::Login],
            },
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.welcome.is_some()
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.welcome {
            write!(f, "Welcome, {name} | ")?;
        }
        let labels: Vec<_> = self.actions.iter().map(|a| a.label()).collect();
        write!(f, "{}", labels.join(" | "))
    }
}
