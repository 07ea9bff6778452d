//! Permit specs for the article and comment request bodies

use crate::params::{ParamResult, Parameters, PermitSpec};

/// `{"article": {...}}` → title, rank, body, comments_attributes
pub fn article_spec() -> PermitSpec {
    PermitSpec::keys(["title", "rank", "body"]).nested(
        "comments_attributes",
        PermitSpec::keys(["id", "author", "content", "_destroy"]),
    )
}

/// `{"comment": {...}}` → author, content, article_id, article_attributes
pub fn comment_spec() -> PermitSpec {
    PermitSpec::keys(["author", "content", "article_id"]).nested(
        "article_attributes",
        PermitSpec::keys(["id", "title", "rank", "body"]),
    )
}

pub fn article_params(params: &Parameters) -> ParamResult<Parameters> {
    Ok(params.require("article")?.permit(&article_spec()))
}

pub fn comment_params(params: &Parameters) -> ParamResult<Parameters> {
    Ok(params.require("comment")?.permit(&comment_spec()))
}
