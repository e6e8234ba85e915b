//! Site content for TaxoBuddy.
//!
//! The marketing pages are driven by three JSON files in the data directory:
//! `about.json` (open positions), `pricing.json` (plans and FAQs) and
//! `blog.json` (posts). [`SiteContent::load`] reads and validates all of them.
//!
//! # Example
//!
//! ```ignore
//! use tb_content::{BillingCycle, SiteContent};
//!
//! let content = SiteContent::load(Path::new("data"))?;
//! for plan in &content.pricing.plans {
//!     println!("{}: {}", plan.name, plan.quote(BillingCycle::Annual));
//! }
//! ```

mod about;
mod blog;
mod contact;
mod error;
mod pricing;
mod sitemap;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use about::{ALL_CATEGORY, AboutData, COLLAPSED_LIMIT, Job, JobBoard, JobCategory};
pub use blog::{BlogData, BlogPost, PostBody, Section, StructuredBody};
pub use contact::ContactMessage;
pub use error::ContentError;
pub use pricing::{BillingCycle, Faq, FaqAccordion, Plan, PlanQuote, PricingData, SIGNUP_URL};
pub use sitemap::{ChangeFreq, Sitemap, SitemapEntry};

pub const ABOUT_FILE: &str = "about.json";
pub const PRICING_FILE: &str = "pricing.json";
pub const BLOG_FILE: &str = "blog.json";

/// All content files of a data directory, validated.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteContent {
    pub about: AboutData,
    pub pricing: PricingData,
    pub blog: BlogData,
}

impl SiteContent {
    /// Load and validate every content file in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first read, parse, or validation failure.
    pub fn load(data_dir: &Path) -> Result<Self, ContentError> {
        let about: AboutData = read_json(&data_dir.join(ABOUT_FILE))?;
        about.validate()?;
        let pricing: PricingData = read_json(&data_dir.join(PRICING_FILE))?;
        pricing.validate()?;
        let blog: BlogData = read_json(&data_dir.join(BLOG_FILE))?;
        blog.validate()?;

        tracing::debug!(
            jobs = about.jobs.len(),
            plans = pricing.plans.len(),
            posts = blog.blog_posts.len() + 1,
            "Loaded site content"
        );
        Ok(Self {
            about,
            pricing,
            blog,
        })
    }
}

/// Read and deserialize one JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}
