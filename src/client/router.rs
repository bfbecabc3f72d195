// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tab selection between the three panels.

/// Panel shown in the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Feed,
    Saved,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Feed, Tab::Saved, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Feed => "Discover",
            Tab::Saved => "My List",
            Tab::Profile => "Profile",
        }
    }
}

/// What the client renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Signed out, with the last sign-in error if any.
    SignIn { error: Option<String> },
    Panel(Tab),
}

#[derive(Debug, Default)]
pub struct ViewRouter {
    active: Tab,
}

impl ViewRouter {
    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = Tab::default();
    }
}
