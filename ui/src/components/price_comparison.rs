use dioxus::prelude::*;

use grocery_common::comparison::PriceTable;
use grocery_common::currency::format_amount;
use grocery_common::item::GroceryItem;
use grocery_common::supermarket::Supermarket;

#[cfg(feature = "use-server")]
use super::list_state::use_list_state;

/// Simulated latency of the price lookup.
#[cfg(target_family = "wasm")]
const FETCH_DELAY_MS: u32 = 1000;

#[cfg(not(feature = "use-server"))]
fn load_inputs() -> (Vec<GroceryItem>, Vec<Supermarket>) {
    use super::browser_storage::LocalStorage;
    use grocery_common::comparison::load_comparison_inputs;

    load_comparison_inputs(&LocalStorage).unwrap_or_else(|e| {
        tracing::error!("Error loading comparison data: {e}");
        (Vec::new(), grocery_common::supermarket::default_supermarkets())
    })
}

#[component]
pub fn PriceComparison() -> Element {
    #[cfg(not(feature = "use-server"))]
    let inputs = use_signal(load_inputs);
    #[cfg(feature = "use-server")]
    let inputs = {
        use super::browser_storage::LocalStorage;
        use grocery_common::supermarket::{default_supermarkets, load_supermarkets};

        let state = use_list_state();
        use_memo(move || {
            let supermarkets =
                load_supermarkets(&LocalStorage).unwrap_or_else(|_| default_supermarkets());
            (state.read().items.clone(), supermarkets)
        })
    };

    let mut prices = use_signal(PriceTable::default);
    let mut loading = use_signal(|| false);

    let fetch_prices = move |_: MouseEvent| {
        spawn(async move {
            loading.set(true);
            #[cfg(target_family = "wasm")]
            gloo_timers::future::TimeoutFuture::new(FETCH_DELAY_MS).await;
            let (items, supermarkets) = inputs.read().clone();
            prices.set(PriceTable::generate(
                &items,
                &supermarkets,
                &mut rand::thread_rng(),
            ));
            loading.set(false);
        });
    };

    let (items, supermarkets) = inputs.read().clone();
    let table = prices.read().clone();
    let priced = !table.is_empty();
    let best = table
        .best_deal(&supermarkets, &items)
        .filter(|_| priced)
        .map(|(s, total)| (s.name.clone(), format_amount(total)));

    rsx! {
        div { class: "price-comparison card",
            h2 { "Price Comparison" }
            button {
                class: "fetch-prices",
                disabled: loading(),
                onclick: fetch_prices,
                if loading() { "Fetching Prices..." } else { "Fetch Latest Prices" }
            }
            table {
                thead {
                    tr {
                        th { "Item" }
                        for s in supermarkets.iter() {
                            th { key: "{s.id.0}", "{s.name}" }
                        }
                    }
                }
                tbody {
                    for item in items.iter() {
                        tr { key: "{item.id}",
                            td { "{item.name} (x{item.quantity_or_one()})" }
                            for s in supermarkets.iter() {
                                td { key: "{s.id.0}",
                                    {
                                        table
                                            .line_total(s.id, item)
                                            .map(format_amount)
                                            .unwrap_or_else(|| "-".to_string())
                                    }
                                }
                            }
                        }
                    }
                    tr { class: "total",
                        td { "Total" }
                        for s in supermarkets.iter() {
                            td { key: "{s.id.0}",
                                if priced {
                                    {format_amount(table.total_for(s.id, &items))}
                                } else {
                                    "-"
                                }
                            }
                        }
                    }
                }
            }
            div { class: "best-deal",
                h3 { "Best Deal:" }
                if let Some((name, total)) = best {
                    div { class: "best-deal-card",
                        span { class: "best-deal-name", "🛒 {name}" }
                        span { class: "best-deal-total", "{total}" }
                    }
                } else {
                    p { class: "hint", "Fetch prices to see where your list is cheapest." }
                }
            }
        }
    }
}
