use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::hooks::{use_ranking, use_user_stats};

#[component]
pub fn UserStats() -> Element {
    let stats = use_user_stats();
    let ranking = use_ranking();

    let stats = stats.read().clone();
    let rank_label = match *ranking.read() {
        Some(Some(r)) if r.is_ranked() => format!("#{} of {}", r.rank, r.total_users),
        Some(Some(r)) => format!("Unranked ({} navigators)", r.total_users),
        _ => "...".to_string(),
    };

    rsx! {
        div { class: "card",
            h3 { class: "text-lg font-semibold text-gold mb-4", "Your Journey" }

            match stats {
                None | Some(None) => rsx! {
                    div { class: "animate-pulse space-y-3",
                        div { class: "h-4 bg-gray-700 rounded w-3/4" }
                        div { class: "h-4 bg-gray-700 rounded w-1/2" }
                        div { class: "h-4 bg-gray-700 rounded w-2/3" }
                    }
                },
                Some(Some(stats)) => rsx! {
                    div { class: "space-y-3",
                        StatRow { label: "Total check-ins", value: stats.total_checkins.to_string() }
                        StatRow {
                            label: "Current streak",
                            value: format!("{} days", stats.current_streak),
                            highlight: stats.current_streak > 0,
                        }
                        StatRow { label: "Best streak", value: format!("{} days", stats.max_streak) }
                        StatRow { label: "Global rank", value: rank_label }
                        StatRow { label: "Active on", value: chain_list(&stats.chains) }
                    }
                },
            }
        }
    }
}

fn chain_list(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .filter_map(|id| chains::find(*id))
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Props, Clone, PartialEq)]
pub struct StatRowProps {
    label: &'static str,
    value: String,
    #[props(default = false)]
    highlight: bool,
}

#[component]
pub fn StatRow(props: StatRowProps) -> Element {
    let value_class = if props.highlight {
        "text-gold font-semibold"
    } else {
        "text-gray-300"
    };

    rsx! {
        div { class: "flex justify-between items-center",
            span { class: "text-gray-500", "{props.label}" }
            span { class: "{value_class} font-mono", "{props.value}" }
        }
    }
}
