use axum::response::Html;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Pizzatron</title>
  <style>
    body { max-width: 40rem; margin: 4rem auto; padding: 0 1rem; font-family: Georgia, serif; background: #fdf6e3; color: #3b2f2f; }
    h1 { color: #c0392b; margin-bottom: 0.2rem; }
    .tagline { font-style: italic; margin-top: 0; }
    ul { line-height: 1.8; }
    code { background: #f3e5c8; padding: 0 0.3rem; border-radius: 3px; }
    a.docs { display: inline-block; margin-top: 1.5rem; padding: 0.6rem 1.2rem; background: #c0392b; color: #fff; text-decoration: none; border-radius: 4px; }
  </style>
</head>
<body>
  <h1>Pizzatron</h1>
  <p class="tagline">Submit your pizza. Let the machine judge it.</p>
  <ul>
    <li><code>POST /chefs</code> register a chef, with an optional photo for a portrait</li>
    <li><code>POST /pizzas</code> submit one to three photos of a pizza for review</li>
    <li><a href="/chefs">/chefs</a>, <a href="/pizzas">/pizzas</a> browse submissions and reviews</li>
    <li><a href="/leaderboard">/leaderboard</a> the best pizzas by average score</li>
    <li><a href="/review-categories">/review-categories</a> what the judge scores</li>
  </ul>
  <a class="docs" href="/swagger-ui/">Explore API Docs</a>
</body>
</html>
"#)
}
