use std::collections::BTreeMap;
use std::env;

use anyhow::Context;

use pizzatron::models::review::ReviewDraft;
use pizzatron::services::store::Store;

// name, reviews (summary, score for every category except Overall, Overall)
const DEMO_CHEFS: &[(&str, &[(&str, i32, i32)])] = &[
    (
        "Mario Rossi",
        &[
            ("Leopard-spotted cornicione, textbook Neapolitan.", 5, 5),
            ("Slightly pale underneath but well shaped.", 4, 4),
        ],
    ),
    ("Luigi Verdi", &[("Uneven stretch and a soggy centre.", 2, 3)]),
    ("Giulia Bianchi", &[("Bright tomato, tidy toppings, good char.", 4, 5)]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pizzatron.db?mode=rwc".to_string());
    let store = Store::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let categories: Vec<String> = store
        .list_review_categories()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    for (name, reviews) in DEMO_CHEFS {
        let chef = store.create_chef(name, None).await?;
        for (summary, score, overall) in reviews.iter() {
            let pizza = store.create_pizza(chef.id).await?;
            let scores: BTreeMap<String, i32> = categories
                .iter()
                .map(|c| {
                    let value = if c == "Overall" { *overall } else { *score };
                    (c.clone(), value)
                })
                .collect();
            store
                .record_review(
                    pizza.id,
                    &ReviewDraft {
                        review_summary: summary.to_string(),
                        scores,
                    },
                )
                .await?;
        }
        println!("Seeded chef '{}' with {} reviewed pizzas", chef.name, reviews.len());
    }

    for entry in store.top_pizzas_by_average_score(10).await? {
        println!(
            "#{} pizza {} by {} ({:.2})",
            entry.rank, entry.pizza.id, entry.pizza.chef_name, entry.average_score
        );
    }
    Ok(())
}
