//! `sitemap.xml` generation.

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::ContentError;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub loc: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Public pages of the site with one shared modification time.
#[derive(Debug)]
pub struct Sitemap {
    base_url: String,
    lastmod: DateTime<Utc>,
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Empty sitemap for `base_url`.
    pub fn new(base_url: &str, lastmod: DateTime<Utc>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            lastmod,
            entries: Vec::new(),
        }
    }

    /// Sitemap with the marketing and legal pages.
    pub fn site(base_url: &str, lastmod: DateTime<Utc>) -> Self {
        let mut sitemap = Self::new(base_url, lastmod);
        sitemap.add("/", ChangeFreq::Monthly, 1.0);
        sitemap.add("/about", ChangeFreq::Monthly, 0.8);
        sitemap.add("/contact", ChangeFreq::Monthly, 0.8);
        sitemap.add("/legal/privacy-policy", ChangeFreq::Yearly, 0.5);
        sitemap.add("/legal/disclaimer", ChangeFreq::Yearly, 0.5);
        sitemap
    }

    /// Add a page by path. `/` maps to the bare base URL.
    pub fn add(&mut self, path: &str, changefreq: ChangeFreq, priority: f32) {
        let loc = match path.trim_start_matches('/') {
            "" => self.base_url.clone(),
            rest => format!("{}/{rest}", self.base_url),
        };
        self.entries.push(SitemapEntry {
            loc,
            changefreq,
            priority,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Serialize as sitemap protocol XML.
    pub fn to_xml(&self) -> Result<String, ContentError> {
        let xml_err = |e: std::io::Error| ContentError::Xml(e.to_string());
        let lastmod = self.lastmod.format("%Y-%m-%d").to_string();

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        writer
            .create_element("urlset")
            .with_attribute(("xmlns", SITEMAP_NS))
            .write_inner_content(|w| -> std::io::Result<()> {
                for entry in &self.entries {
                    w.create_element("url")
                        .write_inner_content(|w| -> std::io::Result<()> {
                            w.create_element("loc")
                                .write_text_content(BytesText::new(&entry.loc))?;
                            w.create_element("lastmod")
                                .write_text_content(BytesText::new(&lastmod))?;
                            w.create_element("changefreq")
                                .write_text_content(BytesText::new(entry.changefreq.as_str()))?;
                            let priority = format!("{:.1}", entry.priority);
                            w.create_element("priority")
                                .write_text_content(BytesText::new(&priority))?;
                            Ok(())
                        })?;
                }
                Ok(())
            })
            .map_err(xml_err)?;

        String::from_utf8(writer.into_inner()).map_err(|e| ContentError::Xml(e.to_string()))
    }
}
