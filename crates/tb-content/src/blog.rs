//! Blog posts from `blog.json`.

use std::collections::HashSet;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, require};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Post body broken into parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredBody {
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub pro_tip: Option<String>,
}

/// Post body: plain text or structured sections.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PostBody {
    Text(String),
    Structured(StructuredBody),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(default)]
    pub id: Option<u64>,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub content: Option<PostBody>,
    #[serde(default)]
    pub author: Option<String>,
    pub date: String,
    pub read_time: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BlogPost {
    /// Post as a markdown document.
    ///
    /// Posts without a body fall back to their excerpt.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\n", self.title);

        let mut byline = vec![self.date.as_str(), self.read_time.as_str(), self.category.as_str()];
        if let Some(author) = &self.author {
            byline.insert(0, author);
        }
        writeln!(md, "*{}*\n", byline.join(" · ")).unwrap();

        match &self.content {
            None => writeln!(md, "{}\n", self.excerpt).unwrap(),
            Some(PostBody::Text(text)) => writeln!(md, "{text}\n").unwrap(),
            Some(PostBody::Structured(body)) => write_structured(&mut md, body),
        }

        if !self.tags.is_empty() {
            let tags: Vec<_> = self.tags.iter().map(|t| format!("`{t}`")).collect();
            writeln!(md, "Tags: {}", tags.join(" ")).unwrap();
        }
        md
    }

    /// Post rendered to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        tb_renderer::render(&self.to_markdown())
    }
}

fn write_structured(md: &mut String, body: &StructuredBody) {
    if let Some(intro) = &body.intro {
        writeln!(md, "{intro}\n").unwrap();
    }
    for section in &body.sections {
        writeln!(md, "## {}\n\n{}\n", section.title, section.content).unwrap();
    }
    if !body.key_takeaways.is_empty() {
        md.push_str("## Key Takeaways\n\n");
        for takeaway in &body.key_takeaways {
            writeln!(md, "- {takeaway}").unwrap();
        }
        md.push('\n');
    }
    if let Some(tip) = &body.pro_tip {
        writeln!(md, "> **Pro tip:** {tip}\n").unwrap();
    }
    if let Some(conclusion) = &body.conclusion {
        writeln!(md, "{conclusion}\n").unwrap();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogData {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub blog_posts: Vec<BlogPost>,
    pub featured_post: BlogPost,
}

impl BlogData {
    /// Look a post up by slug, regular posts first, then the featured one.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&BlogPost> {
        self.blog_posts
            .iter()
            .chain(std::iter::once(&self.featured_post))
            .find(|post| post.slug == slug)
    }

    /// Regular posts in `category`.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a BlogPost> {
        self.blog_posts.iter().filter(move |p| p.category == category)
    }

    /// All posts including the featured one.
    pub fn all_posts(&self) -> impl Iterator<Item = &BlogPost> {
        std::iter::once(&self.featured_post).chain(&self.blog_posts)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let mut slugs = HashSet::new();
        for post in self.all_posts() {
            require(&post.slug, "blogPosts", "slug")?;
            let record = format!("post '{}'", post.slug);
            require(&post.title, &record, "title")?;
            if post.slug.contains('/') {
                return Err(ContentError::invalid(record, "slug cannot contain '/'"));
            }
            if !slugs.insert(post.slug.as_str()) {
                return Err(ContentError::invalid(record, "slug is duplicated"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BLOG_JSON: &str = r#"{
        "categories": ["All", "GST", "Income Tax"],
        "featuredPost": {
            "slug": "ai-in-tax-research", "title": "AI in Tax Research",
            "excerpt": "How AI changes research.", "author": "Team TaxoBuddy",
            "date": "2025-01-10", "readTime": "6 min read", "category": "Income Tax",
            "image": "/blog/ai.png", "tags": ["AI"],
            "content": {
                "intro": "Research is changing.",
                "sections": [{"title": "Speed", "content": "Answers in seconds."}],
                "keyTakeaways": ["Faster", "Cited"],
                "proTip": "Verify citations.",
                "conclusion": "Adopt early."
            }
        },
        "blogPosts": [
            {"id": 1, "slug": "gst-basics", "title": "GST Basics", "excerpt": "Intro to GST.",
             "date": "2025-02-01", "readTime": "4 min read", "category": "GST",
             "image": "/blog/gst.png", "tags": [], "content": "GST is a value added tax."},
            {"id": 2, "slug": "itr-deadlines", "title": "ITR Deadlines", "excerpt": "Key dates.",
             "date": "2025-03-01", "readTime": "3 min read", "category": "Income Tax",
             "image": "/blog/itr.png", "tags": ["deadlines"]}
        ]
    }"#;

    fn blog() -> BlogData {
        serde_json::from_str(BLOG_JSON).unwrap()
    }

    #[test]
    fn test_parse_and_validate() {
        let data = blog();
        assert_eq!(data.blog_posts.len(), 2);
        assert!(matches!(data.featured_post.content, Some(PostBody::Structured(_))));
        assert!(matches!(data.blog_posts[0].content, Some(PostBody::Text(_))));
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_find_posts_then_featured() {
        let data = blog();
        assert_eq!(data.find("gst-basics").unwrap().title, "GST Basics");
        assert_eq!(data.find("ai-in-tax-research").unwrap().title, "AI in Tax Research");
        assert!(data.find("missing").is_none());
    }

    #[test]
    fn test_find_prefers_regular_post() {
        let mut data = blog();
        data.featured_post.slug = "gst-basics".to_owned();
        data.featured_post.title = "Featured copy".to_owned();
        assert_eq!(data.find("gst-basics").unwrap().title, "GST Basics");
    }

    #[test]
    fn test_by_category() {
        let data = blog();
        let slugs: Vec<_> = data.by_category("Income Tax").map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["itr-deadlines"]);
    }

    #[test]
    fn test_validate_duplicate_slug() {
        let mut data = blog();
        data.blog_posts[1].slug = "gst-basics".to_owned();
        assert_eq!(
            data.validate().unwrap_err().to_string(),
            "post 'gst-basics': slug is duplicated"
        );
    }

    #[test]
    fn test_structured_markdown() {
        let data = blog();
        let md = data.featured_post.to_markdown();
        assert_eq!(
            md,
            "# AI in Tax Research\n\n\
             *Team TaxoBuddy · 2025-01-10 · 6 min read · Income Tax*\n\n\
             Research is changing.\n\n\
             ## Speed\n\nAnswers in seconds.\n\n\
             ## Key Takeaways\n\n- Faster\n- Cited\n\n\
             > **Pro tip:** Verify citations.\n\n\
             Adopt early.\n\n\
             Tags: `AI`\n"
        );
    }

    #[test]
    fn test_post_without_body_uses_excerpt() {
        let data = blog();
        let html = data.find("itr-deadlines").unwrap().to_html();
        assert!(html.starts_with(r#"<h1 id="itr-deadlines">ITR Deadlines</h1>"#), "{html}");
        assert!(html.contains("<p>Key dates.</p>"));
    }
}
