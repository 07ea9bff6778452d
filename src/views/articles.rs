//! Article JSON views

use serde::Serialize;
use serde_json::Value;

use crate::model::Article;

/// One element of the article index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleJson {
    pub id: i64,
    pub title: Option<String>,
    pub rank: Option<i64>,
    pub body: Option<String>,
    pub url: String,
}

impl ArticleJson {
    /// Project a persisted article; unsaved articles have no URL
    pub fn from_article(article: &Article, base_url: &str) -> Option<Self> {
        let id = article.id?;
        Some(Self {
            id,
            title: article.title.clone(),
            rank: article.rank,
            body: article.body.clone(),
            url: article_url(base_url, id),
        })
    }
}

/// `<base_url>/articles/<id>.json`
pub fn article_url(base_url: &str, id: i64) -> String {
    format!("{}/articles/{}.json", base_url.trim_end_matches('/'), id)
}

/// Render the article index as a JSON array
pub fn render_article_index<'a, I>(articles: I, base_url: &str) -> serde_json::Result<Value>
where
    I: IntoIterator<Item = &'a Article>,
{
    let items: Vec<ArticleJson> = articles
        .into_iter()
        .filter_map(|article| ArticleJson::from_article(article, base_url))
        .collect();

    serde_json::to_value(items)
}
