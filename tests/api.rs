mod common;

use std::collections::BTreeMap;

use pizzatron::models::review::{ReviewDraft, DEFAULT_REVIEW_CATEGORIES};

use crate::common::{routes, Form, StubProvider, TestApp};

mod chefs {
    use super::*;

    #[tokio::test]
    async fn chef_without_image_is_stored_with_no_image_path() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::CHEFS, Form::new().text("name", "  Mario Rossi "))
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "Mario Rossi");
        assert!(res.body["image_path"].is_null());

        let list = app.get(routes::CHEFS).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body.as_array().unwrap().len(), 1);
        assert_eq!(list.body[0]["pizza_count"], 0);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_form(routes::CHEFS, Form::new().text("name", "   ")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Chef name is required");
    }

    #[tokio::test]
    async fn unsupported_image_format_creates_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::CHEFS,
                Form::new()
                    .text("name", "Mario")
                    .file("image", "portrait.bmp", b"bmp"),
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(app.store.list_chefs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn uploaded_image_is_replaced_by_generated_portrait() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::CHEFS,
                Form::new()
                    .text("name", "Mario Rossi")
                    .file("image", "me.JPG", b"not really a jpeg"),
            )
            .await;
        assert_eq!(res.status, 201);
        let id = res.body["id"].as_i64().unwrap();
        let uploaded = res.body["image_path"].as_str().unwrap().to_string();
        assert!(uploaded.starts_with("/static/images/chefs/chef_temp_"));
        assert!(uploaded.ends_with(".jpg"));

        let app = app.settle().await;
        let chef = app.get(&routes::chef(id)).await;
        let portrait = chef.body["image_path"].as_str().unwrap();
        assert!(portrait.starts_with("/static/images/chefs/chef_ai_"));

        let served = app.get(portrait).await;
        assert_eq!(served.status, 200);
        assert_eq!(served.bytes, b"generated portrait");
        assert_eq!(app.get(&uploaded).await.bytes, b"not really a jpeg");
    }

    #[tokio::test]
    async fn failed_generation_keeps_uploaded_image() {
        let app = TestApp::with_provider(StubProvider::scoring(4).failing_images()).await;

        let res = app
            .post_form(
                routes::CHEFS,
                Form::new()
                    .text("name", "Luigi")
                    .file("image", "me.png", b"png"),
            )
            .await;
        let id = res.body["id"].as_i64().unwrap();
        let uploaded = res.body["image_path"].clone();

        let app = app.settle().await;
        assert_eq!(app.get(&routes::chef(id)).await.body["image_path"], uploaded);
        assert_eq!(
            app.provider
                .image_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            3
        );
    }

    #[tokio::test]
    async fn deleting_a_chef_removes_everything_it_owns() {
        let app = TestApp::spawn().await;
        let id = app.create_chef("Mario").await;
        let pizza = app.submit_pizza(id, 2).await;
        let pizza_id = pizza.body["id"].as_i64().unwrap();
        let app = app.settle().await;

        assert_eq!(app.delete(&routes::chef(id)).await.status, 204);

        assert_eq!(app.get(&routes::chef(id)).await.status, 404);
        assert_eq!(app.get(&routes::pizza(pizza_id)).await.status, 404);
        assert_eq!(app.delete(&routes::chef(id)).await.status, 404);
        assert!(app.get(routes::LEADERBOARD).await.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_chef_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::chef(42)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Chef with ID 42 not found");
    }
}

mod pizzas {
    use super::*;

    #[tokio::test]
    async fn submitted_pizza_is_reviewed_in_the_background() {
        let app = TestApp::spawn().await;
        let chef_id = app.create_chef("Mario Rossi").await;

        let res = app.submit_pizza(chef_id, 2).await;

        assert_eq!(res.status, 201, "{}", res.body);
        let pizza_id = res.body["id"].as_i64().unwrap();
        assert_eq!(res.body["chef_name"], "Mario Rossi");
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert!(images[0]["image_path"]
            .as_str()
            .unwrap()
            .starts_with(&format!("/static/images/pizzas/pizza_{pizza_id}_1_")));

        let app = app.settle().await;
        let pizza = app.get(&routes::pizza(pizza_id)).await;
        assert_eq!(pizza.body["review_pending"], false);
        assert_eq!(pizza.body["review"]["summary"], "Good");
        let scores = pizza.body["review"]["scores"].as_array().unwrap();
        assert_eq!(scores.len(), DEFAULT_REVIEW_CATEGORIES.len());
        assert!(scores.iter().all(|s| s["score"] == 4));

        let requests = app.provider.review_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].images.len(), 2);
        assert_eq!(requests[0].system_prompt, "Judge Mario Rossi");
    }

    #[tokio::test]
    async fn image_count_must_be_between_one_and_three() {
        let app = TestApp::spawn().await;
        let chef_id = app.create_chef("Mario").await;

        for count in [0, 4] {
            let res = app.submit_pizza(chef_id, count).await;
            assert_eq!(res.status, 400, "{count} images");
            assert_eq!(res.body["error"], "Please upload between 1 and 3 images");
        }
        assert!(app.store.list_pizzas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_or_malformed_chef_is_a_validation_error() {
        let app = TestApp::spawn().await;

        assert_eq!(app.submit_pizza(999, 1).await.status, 400);

        let res = app
            .post_form(
                routes::PIZZAS,
                Form::new()
                    .text("chef_id", "mario")
                    .file("images", "a.jpg", b"jpeg"),
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .post_form(routes::PIZZAS, Form::new().file("images", "a.jpg", b"jpeg"))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unsupported_pizza_image_is_rejected() {
        let app = TestApp::spawn().await;
        let chef_id = app.create_chef("Mario").await;

        let res = app
            .post_form(
                routes::PIZZAS,
                Form::new()
                    .text("chef_id", &chef_id.to_string())
                    .file("images", "pizza.tiff", b"tiff"),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn failed_image_storage_leaves_no_pizza_behind() {
        let app = TestApp::spawn().await;
        let chef_id = app.create_chef("Mario").await;
        let images = app.blobs.root().join("images");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(images.join("pizzas"), b"not a directory").unwrap();

        let res = app.submit_pizza(chef_id, 2).await;

        assert_eq!(res.status, 500);
        assert!(app.store.list_pizzas().await.unwrap().is_empty());
        let chef = app.get(&routes::chef(chef_id)).await;
        assert!(chef.body["pizzas"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreviewed_pizza_reports_pending() {
        let app = TestApp::spawn().await;
        let chef_id = app.create_chef("Mario").await;
        let pizza = app.store.create_pizza(chef_id as i32).await.unwrap();

        let res = app.get(&routes::pizza(pizza.id as i64)).await;

        assert_eq!(res.status, 200);
        assert!(res.body["review"].is_null());
        assert_eq!(res.body["review_pending"], true);
        assert_eq!(app.get(&routes::pizza(9999)).await.status, 404);
    }
}

mod leaderboard {
    use super::*;

    fn draft(score: i32) -> ReviewDraft {
        ReviewDraft {
            review_summary: format!("scored {score}"),
            scores: DEFAULT_REVIEW_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), score))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn ranks_reviewed_pizzas_and_honours_limit() {
        let app = TestApp::spawn().await;
        let chef = app.store.create_chef("Mario", None).await.unwrap();
        let mut ids = Vec::new();
        for score in [2, 5, 3] {
            let pizza = app.store.create_pizza(chef.id).await.unwrap();
            app.store.record_review(pizza.id, &draft(score)).await.unwrap();
            ids.push(pizza.id);
        }
        app.store.create_pizza(chef.id).await.unwrap();

        let res = app.get(routes::LEADERBOARD).await;
        assert_eq!(res.status, 200);
        let board = res.body.as_array().unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(board[0]["pizza"]["id"], ids[1]);
        assert_eq!(board[0]["rank"], 1);
        assert_eq!(board[0]["average_score"], 5.0);
        assert_eq!(board[2]["pizza"]["id"], ids[0]);

        let top = app.get(&format!("{}?limit=1", routes::LEADERBOARD)).await;
        assert_eq!(top.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lists_review_categories() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::REVIEW_CATEGORIES).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, DEFAULT_REVIEW_CATEGORIES);
    }
}

#[tokio::test]
async fn home_page_links_the_api_docs() {
    let app = TestApp::spawn().await;

    let res = app.get("/").await;

    assert_eq!(res.status, 200);
    let html = String::from_utf8(res.bytes).unwrap();
    assert!(html.contains("Pizzatron"));
    assert!(html.contains("/swagger-ui/"));
}
