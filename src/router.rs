// src/router.rs

//! Fragment-driven routing with bounded fallback.
//!
//! The router is a synchronous state machine: every input returns the
//! commands the driver must execute (render, start/cancel timers, fetch,
//! change the fragment). Keeping timers and the retry counter as explicit
//! fields with a per-navigation lifecycle makes the retry bound and timer
//! cancellation testable without running an event loop.
//!
//! Every load carries a generation token. A fetch completion whose token
//! is no longer current is discarded before it can touch displayed state,
//! so two quick navigations can never race each other's renders.

use std::time::Duration;

use crate::models::{Config, Labels, View};

/// The fragment the intro hands off to.
pub const HOME_FRAGMENT: &str = "holiday";

/// An instruction for the driver executing the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the display with this view
    Render(View),
    /// Arm the intro timer; an existing one was cancelled first
    StartIntroTimer(Duration),
    CancelIntroTimer,
    CancelRotationTimer,
    /// Navigate, observably, to a new fragment
    SetFragment(String),
    /// Begin fetching a feed; the result must echo the generation
    Fetch { fragment: String, generation: u64 },
}

/// Routing states over one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Intro,
    Loading { fragment: String },
    Displayed { fragment: String },
    /// Terminal for this navigation; only a new fragment recovers
    Stuck,
}

/// Fragment router with bounded holiday-fallback retries.
pub struct Router {
    state: RouterState,
    fragment: Option<String>,
    fallback_attempts: u32,
    generation: u64,
    intro: Duration,
    max_fallback_attempts: u32,
    labels: Labels,
}

impl Router {
    pub fn new(config: &Config) -> Self {
        Self {
            state: RouterState::Idle,
            fragment: None,
            fallback_attempts: 0,
            generation: 0,
            intro: Duration::from_millis(config.kiosk.intro_ms),
            max_fallback_attempts: config.kiosk.max_fallback_attempts,
            labels: config.labels.clone(),
        }
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Generation of the most recently started load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fallback_attempts(&self) -> u32 {
        self.fallback_attempts
    }

    /// A navigation: the fragment changed (or the app just started).
    ///
    /// A present fragment resets the fallback counter, so the retry bound
    /// applies per navigation attempt, not globally. An absent fragment
    /// shows the intro, which later hands off to the home fragment.
    pub fn on_fragment(&mut self, fragment: Option<&str>) -> Vec<Command> {
        let fragment = fragment.filter(|f| !f.is_empty());
        self.fragment = fragment.map(str::to_string);
        match fragment {
            None => self.begin_intro(),
            Some(fragment) => {
                self.fallback_attempts = 0;
                self.begin_load(fragment)
            }
        }
    }

    /// The intro timer elapsed: hand off to the home fragment.
    ///
    /// When the fragment already is the home fragment (a retry after a
    /// failed load) the load starts directly, without the counter reset a
    /// fragment change would perform.
    pub fn on_intro_elapsed(&mut self) -> Vec<Command> {
        if self.state != RouterState::Intro {
            return Vec::new();
        }
        if self.fragment.as_deref() == Some(HOME_FRAGMENT) {
            self.begin_load(HOME_FRAGMENT)
        } else {
            vec![Command::SetFragment(HOME_FRAGMENT.to_string())]
        }
    }

    /// A fetch succeeded. Returns the displayed fragment when the result
    /// is current, `None` when it is stale and must be discarded.
    pub fn on_fetch_succeeded(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        let RouterState::Loading { fragment } = &self.state else {
            return None;
        };
        let fragment = fragment.clone();
        self.state = RouterState::Displayed {
            fragment: fragment.clone(),
        };
        Some(fragment)
    }

    /// A fetch failed: retry through the intro while the bound allows,
    /// otherwise declare this navigation stuck.
    pub fn on_fetch_failed(&mut self, generation: u64) -> Vec<Command> {
        if generation != self.generation {
            return Vec::new();
        }
        let RouterState::Loading { fragment } = &self.state else {
            return Vec::new();
        };

        if fragment == HOME_FRAGMENT {
            self.fallback_attempts += 1;
        }

        if self.fallback_attempts < self.max_fallback_attempts {
            self.begin_intro()
        } else {
            self.state = RouterState::Stuck;
            vec![Command::Render(View::Unavailable {
                kicker: self.labels.app_name.clone(),
                headline: self.labels.unavailable_headline.clone(),
                body: self.labels.unavailable_body.clone(),
            })]
        }
    }

    fn begin_intro(&mut self) -> Vec<Command> {
        // an already-running intro is left alone
        if self.state == RouterState::Intro {
            return Vec::new();
        }
        self.state = RouterState::Intro;
        vec![
            Command::CancelRotationTimer,
            Command::Render(View::Intro {
                app_name: self.labels.app_name.clone(),
            }),
            Command::StartIntroTimer(self.intro),
        ]
    }

    fn begin_load(&mut self, fragment: &str) -> Vec<Command> {
        self.generation += 1;
        self.state = RouterState::Loading {
            fragment: fragment.to_string(),
        };
        vec![
            Command::CancelIntroTimer,
            Command::CancelRotationTimer,
            Command::Fetch {
                fragment: fragment.to_string(),
                generation: self.generation,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(&Config::default())
    }

    fn fetch_generation(commands: &[Command]) -> u64 {
        commands
            .iter()
            .find_map(|c| match c {
                Command::Fetch { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("no fetch command issued")
    }

    #[test]
    fn test_empty_fragment_shows_intro_then_home() {
        let mut router = router();
        let commands = router.on_fragment(None);
        assert!(commands.contains(&Command::CancelRotationTimer));
        assert!(matches!(commands[1], Command::Render(View::Intro { .. })));
        assert_eq!(router.state(), &RouterState::Intro);

        let commands = router.on_intro_elapsed();
        assert_eq!(
            commands,
            vec![Command::SetFragment(HOME_FRAGMENT.to_string())]
        );
    }

    #[test]
    fn test_navigation_loads_and_displays() {
        let mut router = router();
        let commands = router.on_fragment(Some("facts"));
        assert_eq!(commands[0], Command::CancelIntroTimer);
        assert_eq!(commands[1], Command::CancelRotationTimer);
        let generation = fetch_generation(&commands);

        assert_eq!(
            router.on_fetch_succeeded(generation),
            Some("facts".to_string())
        );
        assert_eq!(
            router.state(),
            &RouterState::Displayed {
                fragment: "facts".to_string()
            }
        );
    }

    #[test]
    fn test_repeated_intro_request_does_not_restart_timer() {
        let mut router = router();
        assert!(!router.on_fragment(None).is_empty());
        assert!(router.on_fragment(None).is_empty());
    }

    #[test]
    fn test_stale_fetch_results_are_discarded() {
        let mut router = router();
        let first = fetch_generation(&router.on_fragment(Some("facts")));
        let second = fetch_generation(&router.on_fragment(Some("events")));
        assert_ne!(first, second);

        // the superseded fetch completes late, both ways
        assert_eq!(router.on_fetch_succeeded(first), None);
        assert!(router.on_fetch_failed(first).is_empty());
        assert_eq!(router.state(), &RouterState::Loading {
            fragment: "events".to_string()
        });

        assert_eq!(
            router.on_fetch_succeeded(second),
            Some("events".to_string())
        );
    }

    #[test]
    fn test_two_home_failures_within_one_navigation_get_stuck() {
        let mut router = router();

        // start with no fragment: intro, then hand-off to holiday
        router.on_fragment(None);
        router.on_intro_elapsed();
        let generation = fetch_generation(&router.on_fragment(Some(HOME_FRAGMENT)));

        // first failure: counter 1, re-enter intro
        let commands = router.on_fetch_failed(generation);
        assert_eq!(router.fallback_attempts(), 1);
        assert!(matches!(commands[1], Command::Render(View::Intro { .. })));

        // intro elapses with the fragment already on holiday: direct load,
        // no counter reset
        let commands = router.on_intro_elapsed();
        let generation = fetch_generation(&commands);
        assert_eq!(router.fallback_attempts(), 1);

        // second failure: bound reached, terminal card instead of a third
        // intro
        let commands = router.on_fetch_failed(generation);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::Render(View::Unavailable { .. })));
        assert_eq!(router.state(), &RouterState::Stuck);
    }

    #[test]
    fn test_non_home_failure_retries_without_counting() {
        let mut router = router();
        let generation = fetch_generation(&router.on_fragment(Some("facts")));
        let commands = router.on_fetch_failed(generation);
        assert_eq!(router.fallback_attempts(), 0);
        assert!(matches!(commands[1], Command::Render(View::Intro { .. })));
    }

    #[test]
    fn test_new_navigation_resets_the_counter() {
        let mut router = router();
        let generation = fetch_generation(&router.on_fragment(Some(HOME_FRAGMENT)));
        router.on_fetch_failed(generation);
        assert_eq!(router.fallback_attempts(), 1);

        router.on_fragment(Some("facts"));
        assert_eq!(router.fallback_attempts(), 0);
    }

    #[test]
    fn test_stuck_recovers_on_new_navigation() {
        let mut router = router();
        let generation = fetch_generation(&router.on_fragment(Some(HOME_FRAGMENT)));
        router.on_fetch_failed(generation);
        let generation = fetch_generation(&router.on_intro_elapsed());
        router.on_fetch_failed(generation);
        assert_eq!(router.state(), &RouterState::Stuck);

        let commands = router.on_fragment(Some("facts"));
        assert!(fetch_generation(&commands) > 0);
        assert_eq!(router.state(), &RouterState::Loading {
            fragment: "facts".to_string()
        });
    }

    #[test]
    fn test_intro_elapsed_outside_intro_is_ignored() {
        let mut router = router();
        router.on_fragment(Some("facts"));
        assert!(router.on_intro_elapsed().is_empty());
    }
}
