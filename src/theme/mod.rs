pub mod environment;

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

pub use environment::ThemeEnvironment;

/// Storage key the preference is persisted under.
pub const STORAGE_KEY: &str = "theme";
/// Class set on the presentation root while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}', expected 'light' or 'dark'")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    /// Only the exact strings "light" and "dark" are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// Picks the starting theme: a valid persisted value, else the system
/// preference, else light.
pub fn resolve_initial(env: &ThemeEnvironment) -> Theme {
    if let Some(saved) = env.storage.get(STORAGE_KEY)
        && let Ok(theme) = saved.parse()
    {
        return theme;
    }

    if env.color_scheme.prefers_dark() {
        Theme::Dark
    } else {
        Theme::Light
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(Theme) + Send + Sync>;

struct State {
    value: Theme,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

/// Observable cell holding the current theme.
///
/// Subscribers are called synchronously on the thread that changed the
/// value, in subscription order, and once right away when they subscribe.
/// Setting the value the cell already holds notifies nobody.
///
/// Changes are serialized: a `set` holds `notify` from the moment it writes
/// the value until its last subscriber returns, so effects land in the same
/// order as the values. A subscriber must not call `set` on its own store.
pub struct ThemeStore {
    state: Mutex<State>,
    notify: Mutex<()>,
}

impl ThemeStore {
    pub fn new(initial: Theme) -> Self {
        Self {
            state: Mutex::new(State {
                value: initial,
                next_id: 0,
                subscribers: Vec::new(),
            }),
            notify: Mutex::new(()),
        }
    }

    /// Resolves the initial theme from `env` and mirrors every value, the
    /// initial one included, into storage and then onto the presentation root.
    pub fn initialize(env: &ThemeEnvironment) -> Self {
        let initial = resolve_initial(env);
        tracing::debug!("Initial theme resolved to {}", initial);

        let store = Self::new(initial);
        let storage = env.storage.clone();
        let root = env.root.clone();
        store.subscribe(move |theme| {
            storage.set(STORAGE_KEY, theme.as_str());
            root.toggle_class(DARK_CLASS, theme == Theme::Dark);
        });

        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Theme {
        self.lock().value
    }

    pub fn set(&self, theme: Theme) {
        let _notifying = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        let subscribers: Vec<Subscriber> = {
            let mut state = self.lock();
            if state.value == theme {
                return;
            }
            state.value = theme;
            state.subscribers.iter().map(|(_, s)| s.clone()).collect()
        };

        tracing::info!("Theme changed to {}", theme);
        for subscriber in subscribers {
            subscriber(theme);
        }
    }

    pub fn update(&self, f: impl FnOnce(Theme) -> Theme) {
        let next = f(self.get());
        self.set(next);
    }

    pub fn toggle(&self) -> Theme {
        self.update(Theme::toggled);
        self.get()
    }

    pub fn subscribe(
        &self,
        subscriber: impl Fn(Theme) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let _notifying = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        let subscriber: Subscriber = Arc::new(subscriber);
        let (id, current) = {
            let mut state = self.lock();
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            state.subscribers.push((id, subscriber.clone()));
            (id, state.value)
        };

        subscriber(current);
        id
    }

    /// Returns whether `id` was still subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sid, _)| *sid != id);
        state.subscribers.len() != before
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ThemeStore")
            .field("value", &state.value)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
