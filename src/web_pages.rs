use axum::response::Html;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const DASHBOARD_HTML: &str = include_str!("../templates/dashboard.html");

/// Camera capture page.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Photo wall that polls `/api/images`.
pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
