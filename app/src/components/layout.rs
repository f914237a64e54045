use dioxus::prelude::*;
use gm_api::storage::{Preferences, Theme};

use crate::components::{NetworkSelector, WalletButton};
use crate::route::Route;
use crate::storage::LocalStore;

#[component]
pub fn Layout() -> Element {
    let mut preferences = use_context::<Signal<Preferences>>();
    let store = use_context::<LocalStore>();

    let theme = preferences.read().theme;
    let toggle_theme = move |_| {
        let mut prefs = preferences.write();
        prefs.theme = match prefs.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        prefs.save(&store);
    };

    rsx! {
        div { class: "min-h-screen", "data-theme": "{theme}",
            style: "background-color: var(--surface-base);",
            nav { class: "border-b elevated-border backdrop-blur sticky top-0 z-50",
                style: "background-color: var(--surface-base);",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div { class: "flex justify-between h-16",
                        div { class: "flex items-center",
                            Link { to: Route::Checkin {}, class: "flex items-center space-x-2",
                                span { class: "text-2xl font-bold text-gold", "GM" }
                            }
                        }

                        div { class: "hidden sm:flex sm:items-center sm:space-x-8",
                            NavLink { to: Route::Checkin {}, label: "Check-in" }
                            NavLink { to: Route::Leaderboard {}, label: "Leaderboard" }
                            NavLink { to: Route::Stats {}, label: "Stats" }
                            NavLink { to: Route::Referrals {}, label: "Referrals" }
                        }

                        div { class: "flex items-center space-x-4",
                            NetworkSelector {}
                            button {
                                class: "text-mid hover:text-gold",
                                title: "Toggle theme",
                                onclick: toggle_theme,
                                if theme == Theme::Dark { "☀" } else { "☾" }
                            }
                            WalletButton {}
                        }
                    }
                }
            }

            main { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8",
                Outlet::<Route> {}
            }

            footer { class: "border-t elevated-border py-8 mt-auto",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 text-center text-low",
                    p { "GM - say it every day, on every chain" }
                }
            }
        }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link {
            to: to,
            class: "text-mid hover:text-gold px-3 py-2 text-sm font-medium transition-colors",
            "{label}"
        }
    }
}
